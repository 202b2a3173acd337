//! Staff accounts managed from the users view (ADMIN only).

use serde::{Deserialize, Serialize};

use papeleria_core::{Entity, UserId, ValidationErrors, Validator};

use crate::Role;

/// Snapshot of a staff account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: UserId,
    pub cedula: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_active: bool,
}

impl Entity for StaffAccount {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Form for creating a staff account. Defaults to the VENDEDOR role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPayload {
    pub cedula: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Numeric backend role id, sent under `role`.
    #[serde(rename = "role")]
    pub role_id: i64,
}

impl NewUserForm {
    pub fn into_payload(self) -> Result<NewUserPayload, ValidationErrors> {
        self.validate()?;
        let role_id = self
            .role
            .backend_id()
            .ok_or_else(|| ValidationErrors::single("role", "Rol desconocido"))?;
        Ok(NewUserPayload {
            cedula: self.cedula.trim().to_string(),
            name: self.name.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password,
            role_id,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("cedula", &self.cedula, "Cedula es requerida")
            .min_chars("cedula", &self.cedula, 7, "Cedula debe tener al menos 7 digitos")
            .required("name", &self.name, "Name is required")
            .min_chars("name", &self.name, 3, "Name must be more than 3 characters")
            .max_chars("name", &self.name, 32, "Name must be less than 32 characters")
            .required("lastname", &self.lastname, "Lastname is required")
            .min_chars("lastname", &self.lastname, 3, "Lastname must be more than 3 characters")
            .max_chars("lastname", &self.lastname, 32, "Lastname must be less than 32 characters")
            .required("email", &self.email, "Email is required")
            .email("email", &self.email, "Invalid email")
            .required("phone", &self.phone, "Phone is required")
            .min_chars("phone", &self.phone, 10, "Phone must be more than 10 characters")
            .required("password", &self.password, "Password is required")
            .min_chars("password", &self.password, 8, "Password must be more than 8 characters")
            .max_chars("password", &self.password, 20, "Password must be less than 20 characters")
            .check(self.role.backend_id().is_some(), "role", "Rol desconocido")
            .finish()
    }
}

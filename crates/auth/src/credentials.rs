//! Login and self-registration forms.
//!
//! Both are validated before any upstream call; a failing form never leaves
//! the process.

use serde::{Deserialize, Serialize};

use papeleria_core::{ValidationErrors, Validator};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("cedula", &self.cedula, "La cedula es requerida")
            .min_chars("cedula", &self.cedula, 7, "La cedula debe tener al menos 7 digitos")
            .required("password", &self.password, "La contraseña es requerida")
            .min_chars("password", &self.password, 6, "La contraseña debe tener al menos 6 caracteres")
            .max_chars("password", &self.password, 20, "La contraseña debe tener menos de 20 caracteres")
            .finish()
    }
}

/// Self-registration payload; forwarded upstream unchanged once valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.required("email", &self.email, "Email is required")
            .email("email", &self.email, "Invalid email")
            .required("cedula", &self.cedula, "Cedula es requerida")
            .min_chars("cedula", &self.cedula, 7, "Cedula debe tener al menos 7 digitos");

        for (field, value, label) in [
            ("name", &self.name, "Name"),
            ("lastname", &self.lastname, "Lastname"),
            ("username", &self.username, "Username"),
        ] {
            v.required(field, value, &format!("{label} is required"))
                .min_chars(field, value, 3, &format!("{label} must be more than 3 characters"))
                .max_chars(field, value, 32, &format!("{label} must be less than 32 characters"));
        }

        v.required("phone", &self.phone, "Phone is required")
            .min_chars("phone", &self.phone, 10, "Phone must be more than 10 characters")
            .required("address", &self.address, "Address is required")
            .min_chars("address", &self.address, 3, "Address must be more than 3 characters")
            .required("password", &self.password, "Password is required")
            .min_chars("password", &self.password, 8, "Password must be more than 8 characters")
            .max_chars("password", &self.password, 20, "Password must be less than 20 characters")
            .finish()
    }

    /// Credentials for the automatic sign-in after a successful registration.
    pub fn login(&self) -> LoginForm {
        LoginForm {
            cedula: self.cedula.clone(),
            password: self.password.clone(),
        }
    }
}

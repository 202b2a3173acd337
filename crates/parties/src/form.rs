use serde::{Deserialize, Serialize};

use papeleria_core::{Money, ValidationErrors, Validator};

/// Quick client registration from the billing view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClientForm {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClientPayload {
    pub fullname: String,
    pub tax_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(serialize_with = "papeleria_core::money::serialize_as_number")]
    pub credit_limit: Money,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl NewClientForm {
    /// New clients start without credit.
    pub fn into_payload(self) -> Result<NewClientPayload, ValidationErrors> {
        Validator::new()
            .required("fullname", &self.fullname, "El nombre es requerido")
            .required("taxId", &self.tax_id, "El RIF/Cédula es requerido")
            .finish()?;

        Ok(NewClientPayload {
            fullname: self.fullname.trim().to_string(),
            tax_id: self.tax_id.trim().to_string(),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            credit_limit: Money::ZERO,
        })
    }
}

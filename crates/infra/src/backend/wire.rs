//! Wire DTOs for the upstream backend.
//!
//! The backend is inconsistent about field names (`name`/`nombre_producto`,
//! `taxId`/`rif`, ...) and encodes decimals both as numbers and strings.
//! Each DTO keeps every spelling as its own optional field and resolves the
//! precedence in its `into_domain`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use papeleria_accounting::{Currency, ExchangeRate};
use papeleria_auth::{Role, SessionGrant, StaffAccount};
use papeleria_core::{CategoryId, ClientId, CurrencyId, Money, PaymentMethodId, ProductId, SaleId, UserId};
use papeleria_parties::{Client, ContactInfo, CreditProfile};
use papeleria_products::{Category, Product};
use papeleria_sales::{PaymentMethod, Sale, SaleLine};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

/// Number, numeric string or null.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    let text = match raw {
        None | Some(Loose::Flag(_)) => return Ok(None),
        Some(Loose::Number(n)) => n.to_string(),
        Some(Loose::Text(s)) => s,
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Integer, integral string or null.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = lenient_decimal(deserializer)? else {
        return Ok(None);
    };
    let truncated = value.trunc();
    i64::from_str(&truncated.to_string())
        .map(Some)
        .map_err(serde::de::Error::custom)
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Flag(b)) => Some(b),
        Some(Loose::Text(s)) => Some(s.eq_ignore_ascii_case("true")),
        Some(Loose::Number(n)) => Some(n.as_i64().unwrap_or(0) != 0),
        None => None,
    })
}

fn first_text(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn money(value: Option<Decimal>) -> Money {
    Money::new(value.unwrap_or_default())
}

/// A related record sent either as a bare name or as an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NamedRef {
    Text(String),
    Object {
        #[serde(default, deserialize_with = "lenient_i64")]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        nombre: Option<String>,
        #[serde(default)]
        fullname: Option<String>,
    },
}

impl NamedRef {
    pub fn name(&self) -> Option<String> {
        match self {
            NamedRef::Text(s) => first_text([Some(s.clone())]),
            NamedRef::Object { name, nombre, fullname, .. } => {
                first_text([fullname.clone(), name.clone(), nombre.clone()])
            }
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            NamedRef::Text(_) => None,
            NamedRef::Object { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
}

impl CategoryDto {
    pub fn into_domain(self) -> Category {
        Category {
            id: CategoryId::new(self.id),
            name: first_text([self.name, self.nombre]).unwrap_or_else(|| "General".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre_producto: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock_actual: Option<i64>,
    #[serde(default, rename = "minStock", deserialize_with = "lenient_i64")]
    pub min_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock_minimo: Option<i64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub precio_venta: Option<Decimal>,
    #[serde(default)]
    pub sku: Option<String>,
}

impl ProductDto {
    pub fn into_domain(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: first_text([self.name, self.nombre_producto]).unwrap_or_else(|| "Sin Nombre".to_string()),
            brand: first_text([self.brand, self.marca]),
            category: first_text([self.category.and_then(|c| c.name()), self.categoria]),
            stock: self.stock.or(self.stock_actual).unwrap_or(0),
            min_stock: self.min_stock.or(self.stock_minimo).unwrap_or(0),
            price: money(self.price.or(self.precio_venta)),
            sku: first_text([self.sku]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditProfileDto {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub credit_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub current_debt: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub rif: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub credit_profile: Option<CreditProfileDto>,
}

impl ClientDto {
    pub fn into_domain(self) -> Client {
        Client {
            id: ClientId::new(self.id),
            name: first_text([self.fullname, self.name]).unwrap_or_else(|| "Sin Nombre".to_string()),
            tax_id: first_text([self.tax_id, self.rif]),
            contact: ContactInfo {
                email: first_text([self.email]),
                phone: first_text([self.phone]),
                address: first_text([self.address]),
            },
            credit_profile: self.credit_profile.map(|p| CreditProfile {
                credit_limit: money(p.credit_limit),
                current_debt: money(p.current_debt),
                // An absent flag means the profile is in use.
                is_active: p.is_active.unwrap_or(true),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDto {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

impl PaymentMethodDto {
    /// Inactive methods are not offered.
    pub fn into_domain(self) -> Option<PaymentMethod> {
        if self.is_active == Some(false) {
            return None;
        }
        Some(PaymentMethod {
            id: PaymentMethodId::new(self.id),
            name: first_text([self.name]).unwrap_or_else(|| format!("Método {}", self.id)),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemDto {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_id: Option<i64>,
    #[serde(default, rename = "productId", deserialize_with = "lenient_i64")]
    pub product_id_camel: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product: Option<ProductRefDto>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_price: Option<Decimal>,
    #[serde(default, rename = "priceAtSale", deserialize_with = "lenient_decimal")]
    pub price_at_sale: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRefDto {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre_producto: Option<String>,
}

impl SaleItemDto {
    pub fn into_domain(self) -> SaleLine {
        let (ref_id, ref_name) = match self.product {
            Some(p) => (p.id, first_text([p.nombre_producto, p.name])),
            None => (None, None),
        };
        SaleLine {
            product_id: ProductId::new(self.product_id.or(self.product_id_camel).or(ref_id).unwrap_or(0)),
            product_name: first_text([self.product_name]).or(ref_name),
            quantity: self.quantity.unwrap_or(0),
            unit_price: money(self.unit_price.or(self.price_at_sale).or(self.price)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub client: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub payment_method_id: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<NamedRef>,
    #[serde(default)]
    pub items: Option<Vec<SaleItemDto>>,
    #[serde(default)]
    pub sale_details: Option<Vec<SaleItemDto>>,
}

impl SaleDto {
    pub fn into_domain(self) -> Sale {
        let items: Vec<SaleLine> = self
            .items
            .or(self.sale_details)
            .unwrap_or_default()
            .into_iter()
            .map(SaleItemDto::into_domain)
            .collect();
        // Older sales omit the total; fall back to the line sum.
        let total = match self.total {
            Some(total) => Money::new(total),
            None => items.iter().map(SaleLine::subtotal).sum(),
        };
        Sale {
            id: SaleId::new(self.id),
            client_id: self
                .client_id
                .or_else(|| self.client.as_ref().and_then(NamedRef::id))
                .map(ClientId::new),
            client_name: self.client.as_ref().and_then(NamedRef::name),
            payment_method_id: self
                .payment_method_id
                .or_else(|| self.payment_method.as_ref().and_then(NamedRef::id))
                .map(PaymentMethodId::new),
            payment_method: self.payment_method.as_ref().and_then(NamedRef::name),
            total,
            items,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    #[serde(default)]
    pub cedula: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

impl UserDto {
    pub fn into_domain(self) -> StaffAccount {
        StaffAccount {
            id: UserId::new(self.id),
            cedula: self.cedula.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            lastname: self.lastname.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            role: self.role.and_then(|r| r.name()).map(Role::new).unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyDto {
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateDto {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate_value: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<CurrencyDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<NamedRef>,
}

impl ExchangeRateDto {
    pub fn into_domain(self) -> ExchangeRate {
        ExchangeRate {
            id: self.id.unwrap_or(0),
            rate_value: self.rate_value.unwrap_or_default(),
            currency: self.currency.map(|c| Currency {
                id: CurrencyId::new(c.id),
                code: c.code.unwrap_or_default(),
                symbol: c.symbol,
            }),
            created_at: self.created_at,
            recorded_by: self.user.and_then(|u| u.name()),
        }
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    pub access_token: String,
    #[serde(default)]
    pub role: Option<NamedRef>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
}

impl LoginResponseDto {
    /// `fallback_sub` identifies the session when the backend omits the user id.
    pub fn into_grant(self, fallback_sub: &str) -> SessionGrant {
        SessionGrant {
            sub: self.id.map_or_else(|| fallback_sub.to_string(), |id| id.to_string()),
            name: first_text([self.full_name, self.name, self.username]).unwrap_or_else(|| fallback_sub.to_string()),
            role: self.role.and_then(|r| r.name()).map(Role::new).unwrap_or_default(),
            access_token: self.access_token,
        }
    }
}

/// Body of `PATCH /clients/{id}/payment`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDto {
    #[serde(serialize_with = "papeleria_core::money::serialize_as_number")]
    pub abono: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_accepts_both_spellings() {
        let english: ProductDto = serde_json::from_value(json!({
            "id": 1, "name": "Lápiz", "price": "1.50", "stock": 4, "minStock": 5,
            "category": {"id": 2, "name": "Escritura"}
        }))
        .unwrap();
        let spanish: ProductDto = serde_json::from_value(json!({
            "id": 1, "nombre_producto": "Lápiz", "precio_venta": 1.5, "stock_actual": "4",
            "stock_minimo": 5, "categoria": "Escritura"
        }))
        .unwrap();

        let (a, b) = (english.into_domain(), spanish.into_domain());
        assert_eq!(a, b);
        assert_eq!(a.price, Money::new(Decimal::new(15, 1)));
        assert!(a.is_low_stock());
    }

    #[test]
    fn product_without_optional_fields() {
        let p: ProductDto = serde_json::from_value(json!({"id": 3, "price": null})).unwrap();
        let p = p.into_domain();
        assert_eq!(p.name, "Sin Nombre");
        assert_eq!(p.price, Money::ZERO);
        assert_eq!(p.category, None);
    }

    #[test]
    fn client_credit_profile_from_strings() {
        let c: ClientDto = serde_json::from_value(json!({
            "id": 7, "fullname": "Ana Rojas", "rif": "V-1",
            "creditProfile": {"creditLimit": "500.00", "currentDebt": "150.00", "isActive": true}
        }))
        .unwrap();
        let c = c.into_domain();
        assert_eq!(c.name, "Ana Rojas");
        assert_eq!(c.tax_id.as_deref(), Some("V-1"));
        assert_eq!(c.current_debt(), Money::from(150));
        assert!(c.is_debtor());
    }

    #[test]
    fn sale_reads_nested_refs_and_details() {
        let s: SaleDto = serde_json::from_value(json!({
            "id": 12,
            "createdAt": "2025-06-10T14:03:00.000Z",
            "client": {"id": 7, "name": "Ana"},
            "paymentMethod": {"id": 6, "name": "Crédito"},
            "saleDetails": [
                {"product": {"id": 1, "nombre_producto": "Lápiz"}, "quantity": 2, "priceAtSale": "1.50"}
            ]
        }))
        .unwrap();
        let s = s.into_domain();
        assert_eq!(s.client_id, Some(ClientId::new(7)));
        assert_eq!(s.payment_method.as_deref(), Some("Crédito"));
        assert_eq!(s.items[0].product_name.as_deref(), Some("Lápiz"));
        assert_eq!(s.total, Money::new(Decimal::new(3, 0)));
        assert!(s.created_at.is_some());
    }

    #[test]
    fn user_role_as_object_or_text() {
        let a: UserDto = serde_json::from_value(json!({"id": 1, "role": {"id": 2, "name": "ADMIN"}})).unwrap();
        let b: UserDto = serde_json::from_value(json!({"id": 2, "role": "supervisor"})).unwrap();
        let c: UserDto = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(a.into_domain().role, Role::ADMIN);
        assert_eq!(b.into_domain().role, Role::SUPERVISOR);
        assert_eq!(c.into_domain().role, Role::VENDEDOR);
    }

    #[test]
    fn login_name_precedence() {
        let dto: LoginResponseDto = serde_json::from_value(json!({
            "accessToken": "up-token", "role": "ADMIN", "name": "Ana", "username": "arojas"
        }))
        .unwrap();
        let grant = dto.into_grant("12345678");
        assert_eq!(grant.name, "Ana");
        assert_eq!(grant.sub, "12345678");
        assert_eq!(grant.role, Role::ADMIN);

        let dto: LoginResponseDto = serde_json::from_value(json!({
            "accessToken": "t", "fullName": "Ana Rojas", "name": "Ana", "id": 4
        }))
        .unwrap();
        let grant = dto.into_grant("x");
        assert_eq!(grant.name, "Ana Rojas");
        assert_eq!(grant.sub, "4");
    }

    #[test]
    fn inactive_payment_methods_are_hidden() {
        let m: PaymentMethodDto = serde_json::from_value(json!({"id": 2, "name": "Zelle", "isActive": false})).unwrap();
        assert!(m.into_domain().is_none());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Signed notification pushed by the gateway when a session changes state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl CheckoutSession {
    /// Customer email as captured at checkout, falling back to the email we
    /// attached as session metadata when the hosted page did not capture one.
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or_else(|| {
                self.metadata
                    .as_ref()
                    .and_then(|m| m.get("email"))
                    .map(String::as_str)
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLineItems {
    pub data: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub product: Option<Expandable<StripeProduct>>,
}

/// A field the gateway returns either as a bare id or, when expanded, as the
/// full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Object(T),
    Id(String),
}

impl<T> Expandable<T> {
    pub fn object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeProduct {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
}

/// Line item as submitted when creating a checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLineItem {
    pub name: String,
    pub image: Option<String>,
    pub unit_amount: i64,
    pub quantity: i64,
    pub product_id: String,
    pub variant_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutSessionParams {
    pub line_items: Vec<SessionLineItem>,
    pub customer: Option<String>,
    pub customer_email: Option<String>,
    pub user_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub allowed_countries: Vec<String>,
}

impl CheckoutSessionParams {
    /// Flatten into the gateway's bracketed form encoding.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("mode".to_string(), "payment".to_string())];

        for (i, item) in self.line_items.iter().enumerate() {
            form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
            form.push((
                format!("line_items[{i}][price_data][currency]"),
                "eur".to_string(),
            ));
            form.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            if let Some(image) = &item.image {
                form.push((
                    format!("line_items[{i}][price_data][product_data][images][0]"),
                    image.clone(),
                ));
            }
            form.push((
                format!("line_items[{i}][price_data][product_data][metadata][productId]"),
                item.product_id.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][product_data][metadata][variantId]"),
                item.variant_id.clone(),
            ));
        }

        if let Some(customer) = &self.customer {
            form.push(("customer".to_string(), customer.clone()));
        } else if let Some(email) = &self.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }

        form.push((
            "metadata[userId]".to_string(),
            self.user_id.clone().unwrap_or_else(|| "guest".to_string()),
        ));

        for (i, country) in self.allowed_countries.iter().enumerate() {
            form.push((
                format!("shipping_address_collection[allowed_countries][{i}]"),
                country.clone(),
            ));
        }

        form.push(("success_url".to_string(), self.success_url.clone()));
        form.push(("cancel_url".to_string(), self.cancel_url.clone()));
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encoding_carries_metadata_and_countries() {
        let params = CheckoutSessionParams {
            line_items: vec![SessionLineItem {
                name: "Camiseta Pro - Talla M".into(),
                image: Some("https://cdn.example/p.jpg".into()),
                unit_amount: 2999,
                quantity: 2,
                product_id: "prod-1".into(),
                variant_id: "prod-1-M".into(),
            }],
            customer_email: Some("ana@example.com".into()),
            success_url: "https://shop.example/checkout/exito".into(),
            cancel_url: "https://shop.example/checkout/cancelado".into(),
            allowed_countries: vec!["ES".into(), "PT".into()],
            ..Default::default()
        };

        let form = params.to_form();
        let get = |k: &str| {
            form.iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("2999"));
        assert_eq!(
            get("line_items[0][price_data][product_data][metadata][variantId]"),
            Some("prod-1-M")
        );
        assert_eq!(get("customer_email"), Some("ana@example.com"));
        assert_eq!(get("metadata[userId]"), Some("guest"));
        assert_eq!(
            get("shipping_address_collection[allowed_countries][1]"),
            Some("PT")
        );
    }

    #[test]
    fn customer_id_takes_precedence_over_email() {
        let params = CheckoutSessionParams {
            customer: Some("cus_123".into()),
            customer_email: Some("ana@example.com".into()),
            ..Default::default()
        };
        let form = params.to_form();
        assert!(form.iter().any(|(k, v)| k == "customer" && v == "cus_123"));
        assert!(!form.iter().any(|(k, _)| k == "customer_email"));
    }

    #[test]
    fn expanded_product_deserializes_from_object_or_id() {
        let expanded: Price = serde_json::from_value(serde_json::json!({
            "unit_amount": 2999,
            "product": {"id": "prod_1", "name": "Camiseta", "metadata": {"productId": "x"}}
        }))
        .unwrap();
        assert!(expanded.product.unwrap().object().is_some());

        let bare: Price = serde_json::from_value(serde_json::json!({
            "unit_amount": 2999,
            "product": "prod_1"
        }))
        .unwrap();
        assert!(bare.product.unwrap().object().is_none());
    }
}

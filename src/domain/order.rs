use {
    super::error::GatewayError,
    serde::{Deserialize, Serialize},
};

pub const MISSING_ORDER_FIELDS: &str = "Missing amount or currency in body";
pub const NO_APPROVAL_LINK: &str = "No approval link returned from PayPal";

/// Validated create-order input. The amount stays a decimal string end to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    amount: String,
    currency: String,
}

impl OrderRequest {
    pub fn new(amount: Option<String>, currency: Option<String>) -> Result<Self, GatewayError> {
        let amount = amount.map(|a| a.trim().to_string()).unwrap_or_default();
        let currency = currency.map(|c| c.trim().to_string()).unwrap_or_default();
        if amount.is_empty() || currency.is_empty() {
            return Err(GatewayError::Validation(MISSING_ORDER_FIELDS.into()));
        }

        if !is_decimal_literal(&amount) {
            return Err(GatewayError::Validation(format!(
                "amount must be a plain decimal string, got: {amount}"
            )));
        }

        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GatewayError::Validation(format!(
                "currency must be a 3-letter code, got: {currency}"
            )));
        }

        Ok(Self {
            amount,
            currency: currency.to_ascii_uppercase(),
        })
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

// digits, optionally one '.', at least one digit on each side of it
fn is_decimal_literal(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        Some(frac) => digits(whole) && digits(frac),
        None => digits(whole),
    }
}

/// Merchant-facing fields that shape the buyer's approval page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutContext {
    pub brand_name: Option<String>,
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderPayload<'a> {
    intent: &'static str,
    purchase_units: [PurchaseUnit<'a>; 1],
    application_context: ApplicationContext<'a>,
}

#[derive(Debug, Serialize)]
struct PurchaseUnit<'a> {
    amount: Amount<'a>,
}

#[derive(Debug, Serialize)]
struct Amount<'a> {
    currency_code: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct ApplicationContext<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_url: Option<&'a str>,
    landing_page: &'static str,
    user_action: &'static str,
    shipping_preference: &'static str,
}

impl<'a> OrderPayload<'a> {
    /// Single purchase unit, immediate-capture intent.
    pub fn new(request: &'a OrderRequest, context: &'a CheckoutContext) -> Self {
        Self {
            intent: "CAPTURE",
            purchase_units: [PurchaseUnit {
                amount: Amount {
                    currency_code: request.currency(),
                    value: request.amount(),
                },
            }],
            application_context: ApplicationContext {
                brand_name: context.brand_name.as_deref(),
                return_url: context.return_url.as_deref(),
                cancel_url: context.cancel_url.as_deref(),
                landing_page: "NO_PREFERENCE",
                user_action: "PAY_NOW",
                shipping_preference: "NO_SHIPPING",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: Option<String>,
    status: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

/// A provider order that is awaiting buyer approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: String,
    pub approval_url: String,
    pub status: Option<String>,
}

impl CreatedOrder {
    /// Read a 2xx create-order body. The order only counts as created when
    /// both its id and its `approve` link can be extracted.
    pub fn from_response(body: &str) -> Result<Self, GatewayError> {
        let protocol = |message: &str| GatewayError::Protocol {
            message: message.to_string(),
            body: body.to_string(),
        };

        let parsed: OrderResponse = serde_json::from_str(body)
            .map_err(|_| protocol("Unparsable order response from PayPal"))?;

        let order_id = parsed
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| protocol("No order id returned from PayPal"))?;

        let approval_url = parsed
            .links
            .into_iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| protocol(NO_APPROVAL_LINK))?;

        Ok(Self {
            order_id,
            approval_url,
            status: parsed.status,
        })
    }
}

//! 产品数据模型

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::error::CrudError;

/// 服务端分配的产品标识，对客户端不透明（JSON 数字或字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    /// 从 JSON 值取标识；超出 i64 的数字保留其文本形式
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => ProductId::Number(i),
                None => ProductId::Text(n.to_string()),
            }),
            Value::String(s) => Some(ProductId::Text(s.clone())),
            _ => None,
        }
    }

    /// 空字符串不是有效标识
    pub fn is_known(&self) -> bool {
        match self {
            ProductId::Number(_) => true,
            ProductId::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProductId::from(s))
    }
}

impl From<&str> for ProductId {
    /// 规范十进制写法视为数字标识，其余（如 `007`、`+5`）原样作为文本，
    /// 保证 `to_string()` 与输入一致
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => ProductId::Number(n),
            _ => ProductId::Text(s.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ProductId::from_json(&value)
            .ok_or_else(|| de::Error::custom(format!("unsupported product id: {}", value)))
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

/// 服务端返回的产品记录，任何字段都可能缺失或为 null
///
/// 字段按宽松规则解码：数字字段也接受数字字符串，数量截断小数部分，
/// 无法识别的值视为缺失，单条记录的异常不会让整个列表加载失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

mod lenient {
    use super::ProductId;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProductId>, D::Error> {
        Ok(ProductId::from_json(&Value::deserialize(d)?))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let parsed = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|v| v.is_finite()))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let truncate = |f: f64| f.is_finite().then(|| f.trunc() as i64);
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            _ => None,
        })
    }
}

/// 创建/更新请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub description: String,
}

/// 表单模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Creating,
    Editing,
}

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Price,
    Quantity,
    Description,
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(DraftField::Name),
            "price" => Ok(DraftField::Price),
            "quantity" | "qty" => Ok(DraftField::Quantity),
            "description" | "desc" => Ok(DraftField::Description),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// 表单草稿：产品记录的文本副本
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub description: String,
}

impl Draft {
    /// 复制记录字段，缺失字段为空字符串
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone().unwrap_or_default(),
            price: product.price.map(|p| p.to_string()).unwrap_or_default(),
            quantity: product.quantity.map(|q| q.to_string()).unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Price => self.price = value,
            DraftField::Quantity => self.quantity = value,
            DraftField::Description => self.description = value,
        }
    }

    /// 编辑模式下可用于 PUT 的标识
    pub fn known_id(&self) -> Option<&ProductId> {
        self.id.as_ref().filter(|id| id.is_known())
    }

    /// 校验并构造请求体。名称原样发送，仅校验时去除空白。
    pub fn to_payload(&self) -> Result<ProductPayload, CrudError> {
        if self.name.trim().is_empty() {
            return Err(CrudError::name_required());
        }

        Ok(ProductPayload {
            name: self.name.clone(),
            price: parse_float_prefix(&self.price),
            quantity: parse_int_prefix(&self.quantity),
            description: self.description.clone(),
        })
    }
}

fn scan_digits(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

fn scan_sign(bytes: &[u8], pos: usize) -> usize {
    match bytes.get(pos) {
        Some(b'+') | Some(b'-') => pos + 1,
        _ => pos,
    }
}

/// 取最长的十进制数前缀解析为浮点数（忽略前导空白）。
/// 无法解析、非有限值或零都得到 0。
pub fn parse_float_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let int_start = scan_sign(bytes, 0);
    // 尾数结束位置（不含末尾单独的小数点）与继续扫描指数的位置
    let mut mantissa_end = scan_digits(bytes, int_start);
    let mut digits = mantissa_end - int_start;
    let mut pos = mantissa_end;

    if bytes.get(pos) == Some(&b'.') {
        let frac_end = scan_digits(bytes, pos + 1);
        let frac_digits = frac_end - (pos + 1);
        digits += frac_digits;
        if frac_digits > 0 {
            mantissa_end = frac_end;
        }
        pos = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    let mut literal = s[..mantissa_end].to_string();
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let exp_digits_start = scan_sign(bytes, pos + 1);
        let exp_end = scan_digits(bytes, exp_digits_start);
        if exp_end > exp_digits_start {
            literal.push_str(&s[pos..exp_end]);
        }
    }

    literal
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(0.0)
}

/// 取前导十进制整数前缀（忽略前导空白），无法解析得到 0
pub fn parse_int_prefix(input: &str) -> i64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let digits_start = scan_sign(bytes, 0);
    let end = scan_digits(bytes, digits_start);
    if end == digits_start {
        return 0;
    }

    s[..end].parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("12.5"), 12.5);
        assert_eq!(parse_float_prefix("  3.25kg"), 3.25);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("-2"), -2.0);
        assert_eq!(parse_float_prefix("1e3"), 1000.0);
        assert_eq!(parse_float_prefix("2e"), 2.0);
        assert_eq!(parse_float_prefix("7."), 7.0);
        assert_eq!(parse_float_prefix("7.e3"), 7000.0);
        assert_eq!(parse_float_prefix("7.E-1x"), 0.7);
        assert_eq!(parse_float_prefix("abc"), 0.0);
        assert_eq!(parse_float_prefix(""), 0.0);
        assert_eq!(parse_float_prefix("."), 0.0);
        assert_eq!(parse_float_prefix("-"), 0.0);
        assert_eq!(parse_float_prefix("1e999"), 0.0);
        assert!(parse_float_prefix("-0").is_sign_positive());
    }

    #[test]
    fn test_int_prefix() {
        assert_eq!(parse_int_prefix("10"), 10);
        assert_eq!(parse_int_prefix(" 12.7"), 12);
        assert_eq!(parse_int_prefix("-3 boxes"), -3);
        assert_eq!(parse_int_prefix("+8"), 8);
        assert_eq!(parse_int_prefix(""), 0);
        assert_eq!(parse_int_prefix("x1"), 0);
        assert_eq!(parse_int_prefix("99999999999999999999999"), 0);
    }

    #[test]
    fn test_payload_coercion() {
        let draft = Draft {
            name: "Pen".to_string(),
            price: "abc".to_string(),
            ..Draft::default()
        };

        let payload = draft.to_payload().unwrap();
        assert_eq!(
            payload,
            ProductPayload {
                name: "Pen".to_string(),
                price: 0.0,
                quantity: 0,
                description: String::new(),
            }
        );
    }

    #[test]
    fn test_payload_requires_name() {
        let draft = Draft {
            name: "   ".to_string(),
            price: "5".to_string(),
            ..Draft::default()
        };
        let err = draft.to_payload().unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_name_sent_untrimmed() {
        let draft = Draft {
            name: " Pen ".to_string(),
            ..Draft::default()
        };
        assert_eq!(draft.to_payload().unwrap().name, " Pen ");
    }

    #[test]
    fn test_draft_from_product() {
        let product = Product {
            id: Some(ProductId::Number(7)),
            name: Some("Notebook".to_string()),
            price: Some(10.0),
            quantity: Some(3),
            description: None,
        };

        let draft = Draft::from_product(&product);
        assert_eq!(draft.id, Some(ProductId::Number(7)));
        assert_eq!(draft.name, "Notebook");
        assert_eq!(draft.price, "10");
        assert_eq!(draft.quantity, "3");
        assert_eq!(draft.description, "");

        let empty = Draft::from_product(&Product::default());
        assert_eq!(empty, Draft::default());
    }

    #[test]
    fn test_product_id_forms() {
        let p: Product = serde_json::from_str(r#"{"id":"sku-1","name":null}"#).unwrap();
        assert_eq!(p.id, Some(ProductId::Text("sku-1".to_string())));
        assert_eq!(p.name, None);

        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::Number(42));
        assert_eq!(ProductId::from("-3"), ProductId::Number(-3));
        assert_eq!(ProductId::Number(42).to_string(), "42");
        assert!(!ProductId::Text(String::new()).is_known());
    }

    #[test]
    fn test_non_canonical_numeric_id_keeps_text() {
        for raw in ["007", "+5", "-0", " 9"] {
            let id = ProductId::from(raw);
            assert_eq!(id, ProductId::Text(raw.to_string()));
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn test_lenient_record_fields() {
        let p: Product = serde_json::from_str(
            r#"{"id":18446744073709551615,"name":12,"price":"2.00","quantity":10.0,"description":{"x":1}}"#,
        )
        .unwrap();
        assert_eq!(
            p.id,
            Some(ProductId::Text("18446744073709551615".to_string()))
        );
        assert_eq!(p.name.as_deref(), Some("12"));
        assert_eq!(p.price, Some(2.0));
        assert_eq!(p.quantity, Some(10));
        assert_eq!(p.description, None);

        let p: Product =
            serde_json::from_str(r#"{"id":true,"price":"n/a","quantity":"7"}"#).unwrap();
        assert_eq!(p.id, None);
        assert_eq!(p.price, None);
        assert_eq!(p.quantity, Some(7));
    }

    #[test]
    fn test_draft_field_parse() {
        assert_eq!("Qty".parse::<DraftField>().unwrap(), DraftField::Quantity);
        assert!("colour".parse::<DraftField>().is_err());
    }
}

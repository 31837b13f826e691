use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value transfer waiting in the pending pool or sealed inside a block.
///
/// Neither party nor the amount is checked: the amount is kept as whatever
/// JSON value was submitted, so a negative, fractional, textual or null
/// amount is mined exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: Value,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: Value) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;
    use serde_json::json;

    #[test]
    fn keeps_integer_amounts_as_integers() {
        let tx = Transaction::new("alice", "bob", json!(3));
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value, json!({ "sender": "alice", "receiver": "bob", "amount": 3 }));
    }

    #[test]
    fn accepts_negative_and_fractional_amounts() {
        let neg: Transaction =
            serde_json::from_value(json!({ "sender": "a", "receiver": "b", "amount": -1 }))
                .unwrap();
        assert_eq!(neg.amount.as_i64(), Some(-1));

        let frac: Transaction =
            serde_json::from_value(json!({ "sender": "a", "receiver": "b", "amount": 0.5 }))
                .unwrap();
        assert_eq!(frac.amount.as_f64(), Some(0.5));
    }

    #[test]
    fn keeps_non_numeric_amounts_verbatim() {
        let text: Transaction =
            serde_json::from_value(json!({ "sender": "a", "receiver": "b", "amount": "10" }))
                .unwrap();
        assert_eq!(text.amount, json!("10"));

        let null: Transaction =
            serde_json::from_value(json!({ "sender": "a", "receiver": "b", "amount": null }))
                .unwrap();
        assert!(null.amount.is_null());
    }
}

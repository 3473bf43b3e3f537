/// How prices are shown to people. Stored prices are always plain whole units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Currency {
    /// `₹` with Indian digit grouping, e.g. `₹1,20,000`.
    #[default]
    Rupees,
    /// Bare number, e.g. `120000`.
    Plain,
}

impl Currency {
    pub fn price_label(self, amount: u64) -> String {
        match self {
            Currency::Rupees => format!("₹{}", group_lakh(amount)),
            Currency::Plain => amount.to_string(),
        }
    }
}

/// Last three digits, then pairs: 1234567 -> 12,34,567.
fn group_lakh(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, thousands) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(thousands);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupee_labels_use_lakh_grouping() {
        assert_eq!(Currency::Rupees.price_label(0), "₹0");
        assert_eq!(Currency::Rupees.price_label(350), "₹350");
        assert_eq!(Currency::Rupees.price_label(1200), "₹1,200");
        assert_eq!(Currency::Rupees.price_label(120000), "₹1,20,000");
        assert_eq!(Currency::Rupees.price_label(1234567), "₹12,34,567");
    }

    #[test]
    fn plain_labels_are_bare_numbers() {
        assert_eq!(Currency::Plain.price_label(1200), "1200");
        assert_eq!(Currency::default(), Currency::Rupees);
    }
}

//! Product tooltip: a product's emissions as a share of well-known foods
//!
//! Shares are `total * 100 / reference` for beef (43.3), lamb (24) and
//! dairy (20.2), shown with two decimals.

use crate::hierarchy::HierarchyNode;
use serde::Serialize;

/// Reference emission totals the tooltip compares against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reference {
    pub name: &'static str,
    pub total: f64,
}

pub const BEEF: Reference = Reference { name: "beef", total: 43.3 };
pub const LAMB: Reference = Reference { name: "lamb", total: 24.0 };
pub const DAIRY: Reference = Reference { name: "dairy", total: 20.2 };

/// Tooltip order
pub const REFERENCES: [Reference; 3] = [BEEF, LAMB, DAIRY];

/// One line of the tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub reference: &'static str,
    /// Percentage formatted with two decimals, e.g. `"69.28"`
    pub percent: String,
}

/// Structured tooltip for one product node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionComparison {
    pub name: String,
    pub shares: Vec<Share>,
}

/// `total` as a percentage of `reference`, unrounded
pub fn percent_of(total: f64, reference: f64) -> f64 {
    (total * 100.0) / reference
}

/// Two-decimal fixed formatting, rounding exact halves away from zero
pub fn to_fixed_2(value: f64) -> String {
    // `{:.2}` rounds exact binary halves to even, so detect those first.
    // 1074 digits is enough to print any f64 fraction exactly.
    let exact = format!("{:.1074}", value.abs());
    if let Some((int, frac)) = exact.split_once('.') {
        let tie = frac.as_bytes().get(2) == Some(&b'5') && frac[3..].bytes().all(|b| b == b'0');
        if tie {
            let sign = if value.is_sign_negative() { "-" } else { "" };
            return format!("{}{}", sign, round_up_hundredths(int, &frac[..2]));
        }
    }
    format!("{:.2}", value)
}

/// `int.frac` plus one hundredth, carried digit by digit
fn round_up_hundredths(int: &str, frac: &str) -> String {
    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes()).collect();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    let (whole, cents) = digits.split_at(digits.len() - 2);
    let text = |ds: &[u8]| ds.iter().map(|&d| d as char).collect::<String>();
    format!("{}.{}", text(whole), text(cents))
}

pub fn compare(node: &HierarchyNode) -> EmissionComparison {
    EmissionComparison {
        name: node.name.clone(),
        shares: REFERENCES
            .iter()
            .map(|r| Share {
                reference: r.name,
                percent: to_fixed_2(percent_of(node.total, r.total)),
            })
            .collect(),
    }
}

impl EmissionComparison {
    /// Single-line plain text
    pub fn text(&self) -> String {
        let parts: Vec<String> = self
            .shares
            .iter()
            .map(|s| format!("{}% of the emissions of {}", s.percent, s.reference))
            .collect();
        format!("{} produces: {}", self.name, parts.join(", "))
    }

    /// Markup for the viewer's tooltip element
    pub fn html(&self) -> String {
        let mut out = format!(
            "<p class=\"title mt-1\"><span>{} produces:</span><br>",
            escape(&self.name)
        );
        let last = self.shares.len().saturating_sub(1);
        for (i, share) in self.shares.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            out.push_str(&format!(
                "<span>{}% of the emissions of {}{}</span> ",
                share.percent, share.reference, sep
            ));
        }
        out.push_str("</p>");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beef_example() {
        let node = HierarchyNode::new("Beef", "Origin", 30.0);
        let cmp = compare(&node);
        let percents: Vec<_> = cmp.shares.iter().map(|s| s.percent.as_str()).collect();
        assert_eq!(percents, vec!["69.28", "125.00", "148.51"]);
        assert_eq!(
            cmp.text(),
            "Beef produces: 69.28% of the emissions of beef, 125.00% of the emissions of lamb, 148.51% of the emissions of dairy"
        );
    }

    #[test]
    fn test_reference_against_itself() {
        let node = HierarchyNode::new("Bovine Meat (beef herd)", "Origin", 43.3);
        assert_eq!(compare(&node).shares[0].percent, "100.00");
    }

    #[test]
    fn test_to_fixed_2() {
        assert_eq!(to_fixed_2(0.0), "0.00");
        assert_eq!(to_fixed_2(1.005), "1.00"); // binary value is below the half
        assert_eq!(to_fixed_2(0.125), "0.13");
        assert_eq!(to_fixed_2(2.675), "2.67");
        assert_eq!(to_fixed_2(12.5), "12.50");
        assert_eq!(to_fixed_2(-0.125), "-0.13");
        assert_eq!(to_fixed_2(9.995), "9.99"); // below the half in binary
        assert_eq!(to_fixed_2(99.875), "99.88");
        // halves stay exact where f64 spacing is coarser than a thousandth
        assert_eq!(to_fixed_2(17_592_186_044_416.125), "17592186044416.13");
        assert_eq!(to_fixed_2(-17_592_186_044_416.625), "-17592186044416.63");
    }

    #[test]
    fn test_round_up_hundredths_carries() {
        assert_eq!(round_up_hundredths("1", "23"), "1.24");
        assert_eq!(round_up_hundredths("9", "99"), "10.00");
        assert_eq!(round_up_hundredths("0", "09"), "0.10");
    }

    #[test]
    fn test_html_escapes_name() {
        let node = HierarchyNode::new("Nuts & <Seeds>", "Origin", 1.0);
        let html = compare(&node).html();
        assert!(html.contains("Nuts &amp; &lt;Seeds&gt; produces:"));
        assert!(html.contains("of the emissions of dairy</span>"));
        assert!(html.contains("of the emissions of beef,</span>"));
    }
}

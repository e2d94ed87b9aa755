use lazy_static::lazy_static;
use regex::Regex;

// Validate BSC (EVM) address: 0x followed by 40 hex characters
pub fn validate_bsc_address(address: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    }

    RE.is_match(address.trim())
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }

    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

// Format amount with thousands separators and a fixed number of decimals
pub fn format_amount(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_addresses() {
        assert!(validate_bsc_address(
            "0x8894E0a0c962CB723c1976a4421c95949bE2D4E3"
        ));
        assert!(validate_bsc_address(
            " 0x8894e0a0c962cb723c1976a4421c95949be2d4e3 "
        ));
        assert!(!validate_bsc_address("0x8894E0a0c962CB723c1976a4421c95949bE2D4E"));
        assert!(!validate_bsc_address("8894E0a0c962CB723c1976a4421c95949bE2D4E3aa"));
        assert!(!validate_bsc_address("0xZZ94E0a0c962CB723c1976a4421c95949bE2D4E3"));
        assert!(!validate_bsc_address(""));
    }

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            shorten_address("0x8894E0a0c962CB723c1976a4421c95949bE2D4E3"),
            "0x8894...D4E3"
        );
        assert_eq!(shorten_address("0x1234"), "0x1234");
    }

    #[test]
    fn formats_amounts_with_separators() {
        assert_eq!(format_amount(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_amount(999.0, 2), "999.00");
        assert_eq!(format_amount(1000.0, 0), "1,000");
        assert_eq!(format_amount(0.1234567, 7), "0.1234567");
        assert_eq!(format_amount(-2500.5, 1), "-2,500.5");
        assert_eq!(format_amount(-0.001, 2), "0.00");
    }
}

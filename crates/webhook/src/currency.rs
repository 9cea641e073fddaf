use rust_decimal::{Decimal, RoundingStrategy};

const NARROW_NO_BREAK_SPACE: &str = "\u{202f}";
const NO_BREAK_SPACE: &str = "\u{a0}";

/// Renders amounts for one configured currency and locale.
///
/// Supported locales get grouped, locale-style output. Anything else falls
/// back to the currency symbol followed by the currency's fixed decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyFormatter {
    currency: String,
    locale: String,
}

#[derive(Clone, Copy, Debug)]
struct LocaleStyle {
    group: &'static str,
    decimal: char,
    symbol_first: bool,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

impl CurrencyFormatter {
    pub fn new(currency: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            currency: currency.into().trim().to_ascii_uppercase(),
            locale: locale.into().trim().to_owned(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Whether the locale gets grouped output rather than the fallback.
    pub fn is_localized(&self) -> bool {
        locale_style(&self.locale).is_some()
    }

    pub fn format(&self, amount: Decimal) -> String {
        self.format_localized(amount).unwrap_or_else(|| self.format_fallback(amount))
    }

    /// `None` when the locale is not supported.
    pub fn format_localized(&self, amount: Decimal) -> Option<String> {
        let style = locale_style(&self.locale)?;
        let rounded = self.round(amount);
        let digits = self.digits(rounded);
        let number = match digits.split_once('.') {
            Some((whole, fraction)) => {
                format!("{}{}{fraction}", group_digits(whole, style.group), style.decimal)
            }
            None => group_digits(&digits, style.group),
        };
        let sign = sign_of(rounded);

        let rendered = match (currency_symbol(&self.currency, &self.locale), style.symbol_first) {
            (Some(symbol), true) => format!("{sign}{symbol}{number}"),
            (None, true) => format!("{sign}{}{NO_BREAK_SPACE}{number}", self.currency),
            (Some(symbol), false) => format!("{sign}{number}{NO_BREAK_SPACE}{symbol}"),
            (None, false) => format!("{sign}{number}{NO_BREAK_SPACE}{}", self.currency),
        };
        Some(rendered)
    }

    pub fn format_fallback(&self, amount: Decimal) -> String {
        let rounded = self.round(amount);
        let symbol =
            currency_symbol(&self.currency, &self.locale).unwrap_or(self.currency.as_str());
        format!("{}{symbol}{}", sign_of(rounded), self.digits(rounded))
    }

    fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(
            minor_units(&self.currency),
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    fn digits(&self, rounded: Decimal) -> String {
        let places = minor_units(&self.currency) as usize;
        format!("{:.places$}", rounded.abs())
    }
}

fn sign_of(rounded: Decimal) -> &'static str {
    if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.replace('_', "-").to_ascii_lowercase()
}

fn locale_style(locale: &str) -> Option<LocaleStyle> {
    match normalize_locale(locale).as_str() {
        "en-us" | "en-gb" | "en-ca" | "en-au" => {
            Some(LocaleStyle { group: ",", decimal: '.', symbol_first: true })
        }
        "de-de" => Some(LocaleStyle { group: ".", decimal: ',', symbol_first: false }),
        "fr-fr" => {
            Some(LocaleStyle { group: NARROW_NO_BREAK_SPACE, decimal: ',', symbol_first: false })
        }
        _ => None,
    }
}

/// Dollar currencies use a bare `$` only in their home locale.
fn currency_symbol(currency: &str, locale: &str) -> Option<&'static str> {
    let locale = normalize_locale(locale);
    let symbol = match (currency, locale.as_str()) {
        ("USD", "en-ca" | "en-au") => "US$",
        ("USD", _) => "$",
        ("CAD", "en-ca") => "$",
        ("CAD", _) => "CA$",
        ("AUD", "en-au") => "$",
        ("AUD", _) => "A$",
        ("EUR", _) => "€",
        ("GBP", _) => "£",
        ("JPY", _) => "¥",
        ("INR", _) => "₹",
        _ => return None,
    };
    Some(symbol)
}

/// Digits after the decimal mark. Yen and won have no minor unit.
fn minor_units(currency: &str) -> u32 {
    match currency {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn group_digits(whole: &str, separator: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

//! Locale-aware rendering of amounts and dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::AMOUNT_TOLERANCE;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DateFormatStyle {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Medium,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" | "MXN" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `amount` as e.g. `$1,234.50` or `-€12.00`.
pub fn format_currency(amount: f64, code: &str, locale: &LocaleConfig) -> String {
    let amount = if amount.abs() < AMOUNT_TOLERANCE { 0.0 } else { amount };
    let body = format_number(locale, amount.abs(), minor_units_for(code));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol_for(code), body)
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let raw = format!("{:.*}", precision as usize, value);
    let (int_part, fraction) = match raw.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (raw.as_str(), None),
    };
    let grouped = group_digits(int_part, locale.grouping_separator);
    match fraction {
        Some(fraction) => format!("{}{}{}", grouped, locale.decimal_separator, fraction),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{:02} {} {}",
            date.day(),
            month_label(date.month()),
            date.year()
        ),
        DateFormatStyle::Long => date.format("%A, %B %-d, %Y").to_string(),
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

/// Decimals kept for prices and cash-like values.
pub const PRICE_DECIMALS: u32 = 2;

/// Decimals kept for traded amounts.
pub const AMOUNT_DECIMALS: u32 = 6;

/// Round to `decimals` places, half away from zero.
/// Example: round_to(10.005, 2) -> 10.01
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn round_price(value: f64) -> f64 {
    round_to(value, PRICE_DECIMALS)
}

pub fn round_amount(value: f64) -> f64 {
    round_to(value, AMOUNT_DECIMALS)
}

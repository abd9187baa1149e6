//! Presentation of a predicted price.
//!
//! The backend answers in thousands of dollars (the median value of
//! owner-occupied homes in $1000s), so `24.5` reads as `$24.50k`.

/// Render a prediction with two decimals and a thousands suffix.
pub fn format_price(thousands: f64) -> String {
    if thousands < 0.0 {
        format!("-${:.2}k", -thousands)
    } else {
        format!("${thousands:.2}k")
    }
}

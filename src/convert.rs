//! Conversion of ADC codes to degrees Celsius.
//!
//! Platinum RTDs follow the Callendar-Van Dusen relation
//!
//! ```text
//! R(T) = R0 * (1 + A*T + B*T^2 + C*(T - 100)*T^3)
//! ```
//!
//! where the `C` term only applies below 0 °C. Above 0 °C the relation is a
//! quadratic and has a closed form solution. Below 0 °C the quartic is
//! solved with Newton-Raphson iterations seeded from the quadratic root.

use libm::{fabsf, sqrtf};

use crate::{code::AdcCode, error::MathError};

/// Callendar-Van Dusen `A` coefficient (IEC 60751)
pub const CVD_A: f32 = 3.9083e-3;
/// Callendar-Van Dusen `B` coefficient (IEC 60751)
pub const CVD_B: f32 = -5.775e-7;
/// Callendar-Van Dusen `C` coefficient (IEC 60751), below 0 °C only
pub const CVD_C: f32 = -4.183e-12;

/// PT100 resistance at 0 °C
pub const PT100_R0: f32 = 100.0;

/// Reference resistor assumed by [`linear_approximation`], Ω
pub const FALLBACK_REFERENCE_OHMS: f32 = 400.0;

/// Full scale of the 15-bit RTD ratio code
pub const RTD_FULL_SCALE: f32 = 32768.0;

/// MAX31856 linearized thermocouple resolution, °C per LSB
pub const THERMOCOUPLE_RESOLUTION: f32 = 0.007_812_5;
/// MAX31856 cold-junction resolution, °C per LSB
pub const COLD_JUNCTION_RESOLUTION: f32 = 0.015_625;

const NEWTON_MAX_ITERATIONS: usize = 32;
const NEWTON_TOLERANCE: f32 = 1e-3;

/// RTD resistance-temperature model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtdCurve {
    /// Quadratic solve for 0..850 °C, straight line below 0 °C
    Quadratic,
    /// Quartic solve over -200..850 °C
    FullRange,
}

/// How one channel turns its code into degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    /// `code * resolution`
    Linear {
        /// °C per LSB
        resolution: f32,
    },
    /// Resistance ratio code solved on the Callendar-Van Dusen curve
    Rtd {
        /// Curve used for the solve
        curve: RtdCurve,
        /// Reference resistor on the board, Ω
        reference_ohms: f32,
        /// RTD resistance at 0 °C, Ω
        nominal_ohms: f32,
    },
}

impl Conversion {
    /// Convert one code
    ///
    /// # Errors
    ///
    /// Returns an error if the solve has no real root or the result is not finite
    pub fn apply(&self, code: AdcCode) -> Result<f32, MathError> {
        match *self {
            Conversion::Linear { resolution } => linear(code, resolution),
            Conversion::Rtd {
                curve: RtdCurve::Quadratic,
                reference_ohms,
                nominal_ohms,
            } => rtd_quadratic(code, reference_ohms, nominal_ohms),
            Conversion::Rtd {
                curve: RtdCurve::FullRange,
                reference_ohms,
                nominal_ohms,
            } => full_range_solve(resistance(code, reference_ohms), nominal_ohms),
        }
    }
}

fn finite(value: f32) -> Result<f32, MathError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NonFinite)
    }
}

/// Fixed-resolution conversion used by thermocouple and cold-junction channels
///
/// # Errors
///
/// Returns [`MathError::NonFinite`] for a non-finite resolution
#[allow(clippy::cast_precision_loss)]
pub fn linear(code: AdcCode, resolution: f32) -> Result<f32, MathError> {
    finite(code.value() as f32 * resolution)
}

/// Resistance measured by a 15-bit ratio code against `reference_ohms`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn resistance(code: AdcCode, reference_ohms: f32) -> f32 {
    code.value() as f32 * reference_ohms / RTD_FULL_SCALE
}

/// Straight-line approximation `code / 32 - 256` for a PT100 on a 400 Ω reference
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linear_approximation(code: AdcCode) -> f32 {
    code.value() as f32 / 32.0 - 256.0
}

/// Resistance of an RTD at `celsius` on the full Callendar-Van Dusen curve
#[must_use]
pub fn resistance_at(celsius: f32, nominal_ohms: f32) -> f32 {
    let t = celsius;
    let quartic = if t < 0.0 {
        CVD_C * (t - 100.0) * t * t * t
    } else {
        0.0
    };
    nominal_ohms * (1.0 + CVD_A * t + CVD_B * t * t + quartic)
}

/// Positive root of `0 = B*R0*T^2 + A*R0*T + (R0 - R)`
///
/// # Errors
///
/// Returns [`MathError::NegativeDiscriminant`] when no real root exists
pub fn quadratic_solve(resistance: f32, nominal_ohms: f32) -> Result<f32, MathError> {
    let r0 = nominal_ohms;
    let discriminant = CVD_A * CVD_A * r0 * r0 - 4.0 * CVD_B * r0 * (r0 - resistance);

    if discriminant.is_nan() {
        return Err(MathError::NonFinite);
    }
    if discriminant < 0.0 {
        return Err(MathError::NegativeDiscriminant);
    }

    finite((-CVD_A * r0 + sqrtf(discriminant)) / (2.0 * CVD_B * r0))
}

/// Quadratic solve of a ratio code, falling back to
/// [`linear_approximation`] when the quadratic root is below 0 °C
///
/// # Errors
///
/// Returns an error if the discriminant is negative or the result is not finite
pub fn rtd_quadratic(
    code: AdcCode,
    reference_ohms: f32,
    nominal_ohms: f32,
) -> Result<f32, MathError> {
    let celsius = quadratic_solve(resistance(code, reference_ohms), nominal_ohms)?;

    if celsius < 0.0 {
        finite(linear_approximation(code))
    } else {
        Ok(celsius)
    }
}

/// Solve the full Callendar-Van Dusen curve for `resistance`.
///
/// At or above `R0` the curve is quadratic and solved exactly. Below `R0`
/// the quadratic root seeds Newton-Raphson on the quartic.
///
/// # Errors
///
/// Returns an error if the seed has no real root, an iterate is not finite,
/// or the iteration does not settle
pub fn full_range_solve(resistance: f32, nominal_ohms: f32) -> Result<f32, MathError> {
    let seed = quadratic_solve(resistance, nominal_ohms)?;
    if resistance >= nominal_ohms {
        return Ok(seed);
    }

    let r0 = nominal_ohms;
    let mut t = seed;
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let f = resistance_at(t, r0) - resistance;
        let slope = r0
            * (CVD_A + 2.0 * CVD_B * t + CVD_C * (4.0 * t * t * t - 300.0 * t * t));
        let step = finite(f / slope)?;
        t = finite(t - step)?;

        if fabsf(step) < NEWTON_TOLERANCE {
            return Ok(t);
        }
    }

    Err(MathError::NoConvergence)
}

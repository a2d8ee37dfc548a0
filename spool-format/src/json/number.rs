use std::fmt;

/// A JSON number.
///
/// Integers that fit in 64 bits are kept exactly, so integral values never pick
/// up a fractional part on the way back out. Everything else is an `f64`.
#[derive(Clone, Copy)]
pub struct Number {
    n: N,
}

#[derive(Debug, Clone, Copy)]
enum N {
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_f64(f: f64) -> Number {
        Number { n: N::Float(f) }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self.n, N::Float(_))
    }

    /// False only for NaN and the infinities, which JSON cannot represent.
    pub fn is_finite(&self) -> bool {
        match self.n {
            N::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(n) => i64::try_from(n).ok(),
            N::NegInt(n) => Some(n),
            N::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self.n {
            N::PosInt(n) => n as f64,
            N::NegInt(n) => n as f64,
            N::Float(f) => f,
        }
    }

    pub(crate) fn serialize_into<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::Error;

        match self.n {
            N::PosInt(n) => serializer.serialize_u64(n),
            N::NegInt(n) => serializer.serialize_i64(n),
            N::Float(f) if f.is_finite() => serializer.serialize_f64(f),
            N::Float(f) => Err(S::Error::custom(format_args!("non-finite number {}", f))),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (self.n, other.n) {
            (N::PosInt(a), N::PosInt(b)) => a == b,
            (N::NegInt(a), N::NegInt(b)) => a == b,
            (N::PosInt(_), N::NegInt(_)) | (N::NegInt(_), N::PosInt(_)) => false,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({})", self)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            N::PosInt(n) => fmt::Display::fmt(&n, f),
            N::NegInt(n) => fmt::Display::fmt(&n, f),
            N::Float(x) => fmt::Debug::fmt(&x, f),
        }
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Number {
        Number { n: N::PosInt(n) }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Number {
        if n < 0 {
            Number { n: N::NegInt(n) }
        } else {
            Number {
                n: N::PosInt(n as u64),
            }
        }
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Number {
        Number::from(u64::from(n))
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Number {
        Number::from(i64::from(n))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Number {
        Number::from_f64(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_stay_exact() {
        let n = Number::from(u64::MAX);
        assert_eq!(n.as_u64(), Some(u64::MAX));
        assert_eq!(n.as_i64(), None);
        assert!(n.is_integer());
        assert_eq!(n.to_string(), "18446744073709551615");
    }

    #[test]
    fn negative_from_i64() {
        let n = Number::from(-5i64);
        assert_eq!(n.as_i64(), Some(-5));
        assert_eq!(n.as_u64(), None);
        assert_eq!(Number::from(5i64).as_u64(), Some(5));
    }

    #[test]
    fn floats_never_pass_as_integers() {
        let n = Number::from(10.0);
        assert!(!n.is_integer());
        assert_eq!(n.as_u64(), None);
        assert_eq!(n.as_f64(), 10.0);
        assert_eq!(n.to_string(), "10.0");
    }

    #[test]
    fn equality_is_numeric_across_kinds() {
        assert_eq!(Number::from(10u64), Number::from(10.0));
        assert_ne!(Number::from(10u64), Number::from(-10i64));
        assert_ne!(Number::from(f64::NAN), Number::from(f64::NAN));
    }

    #[test]
    fn non_finite_detected() {
        assert!(!Number::from(f64::INFINITY).is_finite());
        assert!(Number::from(1.5).is_finite());
    }
}

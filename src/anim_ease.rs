/// Easing law for [`crate::anim::Player::animate_to`].
///
/// `ConstantSpeed` is linear in time; its duration argument is reinterpreted
/// as milliseconds per unit of distance. `None` jumps straight to the
/// target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    CubicInOut,
    ConstantSpeed,
    None,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear | Self::ConstantSpeed => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::None => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_stable() {
        for ease in [Ease::Linear, Ease::CubicInOut, Ease::ConstantSpeed] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in [Ease::Linear, Ease::CubicInOut, Ease::ConstantSpeed] {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn none_is_a_jump() {
        assert_eq!(Ease::None.apply(0.3), 1.0);
    }
}

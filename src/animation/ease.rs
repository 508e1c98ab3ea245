#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ease {
    Linear,
    /// Polynomial ease-out of the given power: `1 - (1 - t)^(power + 1)`.
    #[default]
    PowerOut1,
    PowerOut2,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,
            Ease::PowerOut1 => 1.0 - (1.0 - t).powi(2),
            Ease::PowerOut2 => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for ease in [Ease::Linear, Ease::PowerOut1, Ease::PowerOut2] {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?}");
        }
    }

    #[test]
    fn out_eases_lead_linear() {
        assert!(Ease::PowerOut1.apply(0.5) > 0.5);
        assert!(Ease::PowerOut2.apply(0.5) > Ease::PowerOut1.apply(0.5));
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::PowerOut2.apply(2.0), 1.0);
    }
}

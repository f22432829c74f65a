//! Power-up state machine
//!
//! Slow and fast live in one `SpeedEffect`, so exclusivity holds by
//! construction. The countdown is driven by wall-clock milliseconds fed in
//! each frame; the accumulator belongs to the effect and is cleared whenever
//! the effect changes, so an expired effect can never be revived by a
//! leftover timer.

use super::state::{CollectibleKind, PowerUps, SpeedEffect};
use crate::consts::MS_PER_COUNTDOWN;
use crate::tuning::Tuning;

/// Apply a collected item
pub fn collect(power_ups: &mut PowerUps, kind: CollectibleKind, tuning: &Tuning) {
    match kind {
        CollectibleKind::Coin => {}
        CollectibleKind::Slow => {
            if power_ups.speed.is_fast() {
                log::debug!("Slow item cancels fast effect");
            }
            activate(power_ups, SpeedEffect::Slow(tuning.effect_seconds));
        }
        CollectibleKind::Speed => {
            if power_ups.speed.is_slow() {
                log::debug!("Speed item cancels slow effect");
            }
            activate(power_ups, SpeedEffect::Fast(tuning.effect_seconds));
        }
        CollectibleKind::Shield => {
            power_ups.shield = true;
        }
    }
}

fn activate(power_ups: &mut PowerUps, effect: SpeedEffect) {
    power_ups.speed = effect;
    power_ups.clock_ms = 0.0;
}

/// Feed elapsed wall-clock time. Returns true if the speed effect expired.
pub fn advance_clock(power_ups: &mut PowerUps, elapsed_ms: f64) -> bool {
    if power_ups.speed == SpeedEffect::None {
        power_ups.clock_ms = 0.0;
        return false;
    }

    power_ups.clock_ms += elapsed_ms.max(0.0);
    while power_ups.clock_ms >= MS_PER_COUNTDOWN {
        power_ups.clock_ms -= MS_PER_COUNTDOWN;
        power_ups.speed = match power_ups.speed {
            SpeedEffect::Slow(s) if s > 1 => SpeedEffect::Slow(s - 1),
            SpeedEffect::Fast(s) if s > 1 => SpeedEffect::Fast(s - 1),
            _ => SpeedEffect::None,
        };
        if power_ups.speed == SpeedEffect::None {
            power_ups.clock_ms = 0.0;
            return true;
        }
    }
    false
}

/// Scroll speed every obstacle and collectible moves at this frame
pub fn scroll_speed(power_ups: &PowerUps, tuning: &Tuning) -> f32 {
    match power_ups.speed {
        SpeedEffect::None => tuning.normal_speed,
        SpeedEffect::Slow(_) => tuning.slow_speed,
        SpeedEffect::Fast(_) => tuning.fast_speed,
    }
}

/// Spend the shield if up. Returns true when a collision was absorbed.
pub fn absorb_hit(power_ups: &mut PowerUps) -> bool {
    std::mem::replace(&mut power_ups.shield, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slow_then_speed_cancels_slow() {
        let tuning = Tuning::default();
        let mut p = PowerUps::default();

        collect(&mut p, CollectibleKind::Slow, &tuning);
        assert_eq!(p.speed, SpeedEffect::Slow(10));
        assert_eq!(scroll_speed(&p, &tuning), tuning.slow_speed);

        advance_clock(&mut p, 2500.0);
        assert_eq!(p.speed, SpeedEffect::Slow(8));

        collect(&mut p, CollectibleKind::Speed, &tuning);
        assert_eq!(p.speed, SpeedEffect::Fast(10));
        assert_eq!(p.clock_ms, 0.0);
        assert_eq!(scroll_speed(&p, &tuning), tuning.fast_speed);
    }

    #[test]
    fn test_countdown_expires_and_restores_speed() {
        let tuning = Tuning::default();
        let mut p = PowerUps::default();
        collect(&mut p, CollectibleKind::Speed, &tuning);

        for _ in 0..9 {
            assert!(!advance_clock(&mut p, 1000.0));
        }
        assert_eq!(p.speed, SpeedEffect::Fast(1));

        // Partial second does nothing
        assert!(!advance_clock(&mut p, 999.0));
        assert!(advance_clock(&mut p, 1.0));
        assert_eq!(p.speed, SpeedEffect::None);
        assert_eq!(scroll_speed(&p, &tuning), tuning.normal_speed);

        // Further time never resurrects it
        assert!(!advance_clock(&mut p, 5000.0));
        assert_eq!(p.speed, SpeedEffect::None);
    }

    #[test]
    fn test_clock_idle_without_effect() {
        let mut p = PowerUps::default();
        assert!(!advance_clock(&mut p, 1500.0));
        assert_eq!(p.clock_ms, 0.0);
    }

    #[test]
    fn test_reactivating_restarts_duration() {
        let tuning = Tuning::default();
        let mut p = PowerUps::default();
        collect(&mut p, CollectibleKind::Slow, &tuning);
        advance_clock(&mut p, 4700.0);
        collect(&mut p, CollectibleKind::Slow, &tuning);
        assert_eq!(p.speed, SpeedEffect::Slow(10));
        assert_eq!(p.clock_ms, 0.0);
    }

    #[test]
    fn test_shield_is_independent_and_one_shot() {
        let tuning = Tuning::default();
        let mut p = PowerUps::default();
        collect(&mut p, CollectibleKind::Slow, &tuning);
        collect(&mut p, CollectibleKind::Shield, &tuning);
        collect(&mut p, CollectibleKind::Shield, &tuning);
        assert!(p.shield);
        assert!(p.speed.is_slow());

        assert!(absorb_hit(&mut p));
        assert!(!p.shield);
        assert!(!absorb_hit(&mut p));
        assert!(p.speed.is_slow());
    }

    fn kind_strategy() -> impl Strategy<Value = CollectibleKind> {
        prop_oneof![
            Just(CollectibleKind::Coin),
            Just(CollectibleKind::Slow),
            Just(CollectibleKind::Speed),
            Just(CollectibleKind::Shield),
        ]
    }

    proptest! {
        #[test]
        fn prop_latest_speed_item_wins(
            steps in prop::collection::vec((kind_strategy(), 0.0f64..3000.0), 1..40)
        ) {
            let tuning = Tuning::default();
            let mut p = PowerUps::default();
            for (kind, ms) in steps {
                collect(&mut p, kind, &tuning);
                match kind {
                    CollectibleKind::Slow => prop_assert!(p.speed.is_slow() && !p.speed.is_fast()),
                    CollectibleKind::Speed => prop_assert!(p.speed.is_fast() && !p.speed.is_slow()),
                    _ => {}
                }
                advance_clock(&mut p, ms);
                prop_assert!(p.speed.seconds_left() <= tuning.effect_seconds);
                prop_assert!(p.clock_ms < MS_PER_COUNTDOWN);
            }
        }
    }
}

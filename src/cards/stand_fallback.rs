//! Fallback: stand still and look ahead

use crate::card::{CardBuilder, Execute, FsmCard};
use crate::core::error::Result;
use crate::fsm::StateGraph;
use crate::ports::{SkillCommand, SkillKind};
use crate::world::Activity;

pub const NAME: &str = "stand_fallback";

pub fn stand_fallback_card() -> Result<FsmCard<Execute, ()>> {
    let graph = StateGraph::<Execute, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::DefaultBehavior)))
        .initial_state(Execute, |s| {
            s.action(|_, _, w| {
                w.call(SkillCommand::LookForward)?;
                w.call(SkillCommand::Stand)
            })
        })
        .build()?;

    CardBuilder::new(NAME)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::Stand)
        .always()
        .exit_when_not_applicable()
        .states(graph)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::cards::testing;
    use crate::world::WorldSnapshot;

    #[test]
    fn test_stands_without_reading_anything() {
        let mut card = stand_fallback_card().unwrap();
        assert!(card.is_catch_all());
        assert!(card.ports().reads().is_empty());

        let (_, frame) = testing::step(&mut card, 1, &WorldSnapshot::default()).unwrap();
        assert_eq!(
            frame.kinds(),
            vec![SkillKind::Activity, SkillKind::LookForward, SkillKind::Stand]
        );
    }
}

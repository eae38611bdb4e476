use chrono::{DateTime, Local};
use rappy_types::{Change, ConfirmedState, ObservedState, Pip, Sky, TransitionEvent};

/// Everything a single observation can produce
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    Transition(TransitionEvent),
    /// Pip emptied while armed and the wild window was never acted on
    Missed { at: DateTime<Local> },
    /// Burst seen again while already confirmed burst. Archival only.
    BurstOngoing { at: DateTime<Local> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ConfirmedState,
    pub events: Vec<MachineEvent>,
}

/// Pure transition rule. `Unknown` axes (`None`) keep the prior value.
pub fn transition(
    prior: ConfirmedState,
    observed: ObservedState,
    armed_consumed: bool,
    at: DateTime<Local>,
) -> Transition {
    let mut state = prior;
    let mut events = Vec::new();

    if let Some(pip) = observed.pip
        && pip != prior.pip
    {
        events.push(MachineEvent::Transition(TransitionEvent::new(
            Change::Pip {
                from: prior.pip,
                to: pip,
            },
            at,
        )));
        if pip == Pip::Empty && prior.is_armed() && !armed_consumed {
            events.push(MachineEvent::Missed { at });
        }
        state.pip = pip;
    }

    match observed.sky {
        Some(sky) if sky != prior.sky => {
            events.push(MachineEvent::Transition(TransitionEvent::new(
                Change::Sky {
                    from: prior.sky,
                    to: sky,
                },
                at,
            )));
            state.sky = sky;
        }
        Some(Sky::Burst) => events.push(MachineEvent::BurstOngoing { at }),
        _ => {}
    }

    Transition { state, events }
}

/// Owns the confirmed state for the life of the run
#[derive(Debug, Default)]
pub struct StateMachine {
    confirmed: ConfirmedState,
    armed_consumed: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(confirmed: ConfirmedState) -> Self {
        Self {
            confirmed,
            armed_consumed: false,
        }
    }

    pub fn confirmed(&self) -> ConfirmedState {
        self.confirmed
    }

    pub fn observe(&mut self, observed: ObservedState, at: DateTime<Local>) -> Vec<MachineEvent> {
        let prior = self.confirmed;
        let Transition { state, events } = transition(prior, observed, self.armed_consumed, at);

        if state != prior {
            tracing::info!("State {} -> {}", prior, state);
        }

        self.armed_consumed = self.armed_consumed && prior.is_armed() && state.is_armed();
        self.confirmed = state;
        events
    }

    /// A homing run pressed the action key, so leaving the armed state
    /// afterwards is not a miss
    pub fn mark_consumed(&mut self) {
        if self.confirmed.is_armed() {
            self.armed_consumed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use rappy_types::Axis;

    use super::*;

    fn observed(pip: Option<Pip>, sky: Option<Sky>) -> ObservedState {
        ObservedState { pip, sky }
    }

    fn transitions(events: &[MachineEvent]) -> Vec<&TransitionEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                MachineEvent::Transition(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_observation_matching_defaults_is_silent() {
        let mut machine = StateMachine::new();
        let events = machine.observe(observed(Some(Pip::Empty), Some(Sky::Default)), Local::now());
        assert!(events.is_empty());
    }

    #[test]
    fn test_sky_debounce_single_event() {
        let mut machine = StateMachine::new();
        let mut all = Vec::new();
        for _ in 0..5 {
            all.extend(machine.observe(observed(None, Some(Sky::Chance)), Local::now()));
        }

        assert_eq!(all.len(), 1);
        let MachineEvent::Transition(event) = &all[0] else {
            panic!("expected transition, got {:?}", all[0]);
        };
        assert_eq!(
            event.change,
            Change::Sky {
                from: Sky::Default,
                to: Sky::Chance
            }
        );
        assert_eq!(machine.confirmed().sky, Sky::Chance);
    }

    #[test]
    fn test_missed_when_leaving_armed() {
        let mut machine = StateMachine::with_state(ConfirmedState::ARMED);
        let events = machine.observe(observed(Some(Pip::Empty), None), Local::now());

        let missed = events
            .iter()
            .filter(|e| matches!(e, MachineEvent::Missed { .. }))
            .count();
        assert_eq!(missed, 1);
        assert_eq!(machine.confirmed().pip, Pip::Empty);

        // staying empty does not repeat it
        let events = machine.observe(observed(Some(Pip::Empty), None), Local::now());
        assert!(events.is_empty());
    }

    #[test]
    fn test_no_missed_after_consumed() {
        let mut machine = StateMachine::with_state(ConfirmedState::ARMED);
        machine.mark_consumed();
        let events = machine.observe(observed(Some(Pip::Empty), Some(Sky::Default)), Local::now());
        assert!(!events.iter().any(|e| matches!(e, MachineEvent::Missed { .. })));
        assert_eq!(transitions(&events).len(), 1);
    }

    #[test]
    fn test_consumed_resets_on_next_arming() {
        let mut machine = StateMachine::with_state(ConfirmedState::ARMED);
        machine.mark_consumed();
        machine.observe(observed(Some(Pip::Empty), None), Local::now());
        machine.observe(observed(Some(Pip::Filled), None), Local::now());
        assert!(machine.confirmed().is_armed());

        let events = machine.observe(observed(Some(Pip::Empty), None), Local::now());
        assert!(events.iter().any(|e| matches!(e, MachineEvent::Missed { .. })));
    }

    #[test]
    fn test_consumed_window_stays_armed_through_unknown_pip() {
        let mut machine = StateMachine::new();
        machine.observe(observed(Some(Pip::Filled), Some(Sky::Default)), Local::now());
        machine.mark_consumed();

        // pip unreadable for a cycle, then filled again for the next window
        machine.observe(observed(None, Some(Sky::Default)), Local::now());
        let events = machine.observe(observed(Some(Pip::Filled), Some(Sky::Default)), Local::now());

        assert!(events.is_empty());
        assert!(machine.confirmed().is_armed());
    }

    #[test]
    fn test_missed_not_emitted_from_non_armed_filled() {
        let prior = ConfirmedState {
            pip: Pip::Filled,
            sky: Sky::Chance,
        };
        let result = transition(prior, observed(Some(Pip::Empty), None), false, Local::now());
        assert!(!result.events.iter().any(|e| matches!(e, MachineEvent::Missed { .. })));
    }

    #[test]
    fn test_unknown_preserves_confirmed() {
        let prior = ConfirmedState {
            pip: Pip::Filled,
            sky: Sky::Burst,
        };
        let result = transition(prior, observed(None, None), false, Local::now());
        assert_eq!(result.state, prior);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_event_carries_new_value() {
        let result = transition(
            ConfirmedState::default(),
            observed(Some(Pip::Filled), Some(Sky::Burst)),
            false,
            Local::now(),
        );
        let events = transitions(&result.events);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].axis(), Axis::Pip);
        assert_eq!(
            events[1].change,
            Change::Sky {
                from: Sky::Default,
                to: Sky::Burst
            }
        );
        assert_eq!(result.state.sky, Sky::Burst);
    }

    #[test]
    fn test_burst_repeat_is_ongoing() {
        let prior = ConfirmedState {
            pip: Pip::Empty,
            sky: Sky::Burst,
        };
        let result = transition(prior, observed(None, Some(Sky::Burst)), false, Local::now());
        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], MachineEvent::BurstOngoing { .. }));
    }
}

use crate::action::{AnimationAction, TrackValue};
use crate::binding::TargetPath;
use crate::target::AnimationTarget;

/// Drives a set of actions from one externally advanced clock.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action and returns its index.
    pub fn add_action(&mut self, action: AnimationAction) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    /// Current time of the first enabled action.
    ///
    /// This is the single time reference every other sampling pass
    /// (opacity tracks, captions) must use for the frame.
    #[must_use]
    pub fn time(&self) -> Option<f32> {
        self.actions.iter().find(|a| a.enabled).map(|a| a.time)
    }

    /// Advances every action by `dt` and writes the sampled values.
    pub fn update(&mut self, dt: f32, target: &mut impl AnimationTarget) {
        for action in &mut self.actions {
            action.update(dt);
        }
        self.apply(target);
    }

    /// Jumps every action to `time` and writes the sampled values.
    /// A non-finite `time` is ignored.
    pub fn set_time(&mut self, time: f32, target: &mut impl AnimationTarget) {
        if !time.is_finite() {
            log::warn!("Ignoring non-finite animation time {time}");
            return;
        }
        for action in &mut self.actions {
            action.time = time;
            action.update(0.0);
        }
        self.apply(target);
    }

    fn apply(&mut self, target: &mut impl AnimationTarget) {
        for action in &mut self.actions {
            if !action.enabled || action.weight <= 0.0 {
                continue;
            }

            for binding_index in 0..action.bindings.len() {
                let track_index = action.bindings[binding_index].track_index;
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };

                let binding = &action.bindings[binding_index];
                match (&binding.target, value) {
                    (TargetPath::Translation, TrackValue::Vector3(v)) => {
                        target.set_translation(binding.node, v);
                    }
                    (TargetPath::Scale, TrackValue::Vector3(v)) => {
                        target.set_scale(binding.node, v);
                    }
                    (TargetPath::Rotation, TrackValue::Quaternion(q)) => {
                        target.set_rotation(binding.node, q);
                    }
                    (TargetPath::Property(name), TrackValue::Scalar(s)) => {
                        target.set_property(binding.node, name, s);
                    }
                    _ => {}
                }
            }
        }
    }
}

use std::collections::HashMap;

use crate::color::codec::{Color, pack_rgba, parse_color, unpack_rgba};
use crate::element::tree::ElementId;
use crate::scene::props::{PropValue, Props, TransitionHook, TransitionValue};

/// Single-shot interpolation state for one (child, prop) pair.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Track {
    pub(crate) progress: u32,
    pub(crate) wait: u32,
    pub(crate) from: PropValue,
    pub(crate) to: PropValue,
    /// Last value handed to the child.
    pub(crate) current: PropValue,
}

impl Track {
    fn at_rest(value: PropValue, delay: u32) -> Self {
        Self {
            progress: 0,
            wait: delay,
            from: value.clone(),
            to: value.clone(),
            current: value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionEvent {
    Start,
    End,
}

/// Callback captured with the child's props at the moment a boundary was crossed.
#[derive(Debug)]
pub(crate) struct Queued {
    event: TransitionEvent,
    prop: String,
    hook: Option<TransitionHook>,
}

#[derive(Debug, Default)]
struct ChildTracks {
    tracks: HashMap<String, Track>,
    queue: Vec<Queued>,
}

/// State of a `transition` element, keyed by child element id.
#[derive(Debug, Default)]
pub(crate) struct TransitionState {
    children: HashMap<ElementId, ChildTracks>,
}

impl TransitionState {
    /// Advance every track of `child` one frame against the child's current props.
    ///
    /// Tracks for props no longer listed in `values` are dropped.
    pub(crate) fn step_child(
        &mut self,
        child: ElementId,
        props: &Props,
        values: &[TransitionValue],
    ) {
        let entry = self.children.entry(child).or_default();
        entry
            .tracks
            .retain(|prop, _| values.iter().any(|v| &v.prop == prop));
        for value in values {
            let Some(target) = props.get(&value.prop) else {
                entry.tracks.remove(&value.prop);
                continue;
            };
            let duration = value.duration.max(1);
            let settled = entry
                .tracks
                .get(&value.prop)
                .is_none_or(|t| t.progress >= duration && t.to == target);
            if settled {
                entry
                    .tracks
                    .insert(value.prop.clone(), Track::at_rest(target, value.delay));
                continue;
            }
            let Some(track) = entry.tracks.get_mut(&value.prop) else {
                continue;
            };

            if track.to != target {
                // Retarget from wherever the child is now.
                track.from = track.current.clone();
                track.to = target;
                track.progress = 0;
                track.wait = value.delay;
            } else if track.from == target {
                // At rest on the target.
            } else if track.wait > 0 {
                track.wait -= 1;
            } else {
                let before = track.progress;
                track.progress = (before + 1).min(duration);
                if before == 0 {
                    entry.queue.push(Queued {
                        event: TransitionEvent::Start,
                        prop: value.prop.clone(),
                        hook: props.handlers.on_transition_start.clone(),
                    });
                }
                if before + 1 == duration {
                    entry.queue.push(Queued {
                        event: TransitionEvent::End,
                        prop: value.prop.clone(),
                        hook: props.handlers.on_transition_end.clone(),
                    });
                }
            }

            let t = value.ease.apply(f64::from(track.progress) / f64::from(duration));
            track.current = match &value.apply {
                Some(apply) => apply(t, &track.from, &track.to),
                None => interpolate(t, &track.from, &track.to),
            };
        }
    }

    /// Fire and clear the callbacks queued for `child`. Returns what fired, in order.
    pub(crate) fn flush(&mut self, child: ElementId) -> Vec<(TransitionEvent, String)> {
        let Some(entry) = self.children.get_mut(&child) else {
            return Vec::new();
        };
        let queue = std::mem::take(&mut entry.queue);
        let mut fired = Vec::with_capacity(queue.len());
        for q in queue {
            if let Some(hook) = &q.hook {
                hook(q.prop.as_str());
            }
            fired.push((q.event, q.prop));
        }
        fired
    }

    /// Overlay the in-flight values of `child` onto its props.
    pub(crate) fn apply_overrides(&self, child: ElementId, props: &mut Props) {
        if let Some(entry) = self.children.get(&child) {
            for (prop, track) in &entry.tracks {
                props.set(prop, track.current.clone());
            }
        }
    }

    pub(crate) fn has_overrides(&self, child: ElementId) -> bool {
        self.children
            .get(&child)
            .is_some_and(|e| !e.tracks.is_empty())
    }

    /// Forget everything about a removed child.
    pub(crate) fn purge(&mut self, child: ElementId) {
        self.children.remove(&child);
    }

    pub(crate) fn tracked_children(&self) -> usize {
        self.children.len()
    }

    #[cfg(test)]
    pub(crate) fn track(&self, child: ElementId, prop: &str) -> Option<&Track> {
        self.children.get(&child)?.tracks.get(prop)
    }
}

/// Default interpolation: rounded lerp for numbers, per-channel lerp for parseable colors,
/// otherwise the target.
fn interpolate(t: f64, from: &PropValue, to: &PropValue) -> PropValue {
    match (from, to) {
        (PropValue::Number(a), PropValue::Number(b)) => {
            PropValue::Number(a + ((b - a) * t).round())
        }
        (PropValue::Color(a), PropValue::Color(b)) => match (packed(a), packed(b)) {
            (Some(a), Some(b)) => PropValue::Color(Color::Packed(lerp_packed(t, a, b))),
            _ => to.clone(),
        },
        _ => to.clone(),
    }
}

fn packed(c: &Color) -> Option<u32> {
    match c {
        Color::Packed(v) => Some(*v),
        Color::Css(s) => parse_color(s).ok(),
    }
}

fn lerp_packed(t: f64, a: u32, b: u32) -> u32 {
    let (a, b) = (unpack_rgba(a), unpack_rgba(b));
    let ch = |i: usize| {
        let (x, y) = (f64::from(a[i]), f64::from(b[i]));
        (x + ((y - x) * t).round()).clamp(0.0, 255.0) as u8
    };
    pack_rgba(ch(0), ch(1), ch(2), ch(3))
}

#[cfg(test)]
#[path = "../../tests/unit/element/transition.rs"]
mod tests;

use bevy::prelude::*;

/// Shows one entity of `objects` at a time; arrow keys step through them.
#[derive(Component, Debug, Clone)]
pub struct SelectionCycle {
    pub objects: Vec<Entity>,
    index: usize,
    pub next_key: KeyCode,
    pub previous_key: KeyCode,
}

impl SelectionCycle {
    pub fn new(objects: Vec<Entity>) -> Self {
        Self {
            objects,
            index: 0,
            next_key: KeyCode::ArrowRight,
            previous_key: KeyCode::ArrowLeft,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<Entity> {
        self.objects.get(self.index).copied()
    }

    /// Move by `delta` with wrap-around. Does nothing on an empty list.
    pub fn step(&mut self, delta: isize) -> Option<Entity> {
        let len = self.objects.len();
        if len == 0 {
            return None;
        }
        self.index = (self.index as isize + delta).rem_euclid(len as isize) as usize;
        self.current()
    }
}

pub(crate) fn cycle_selection(
    keys: Res<ButtonInput<KeyCode>>,
    mut cycles: Query<&mut SelectionCycle>,
    mut objects: Query<(&mut Visibility, Option<&Name>)>,
) {
    for mut cycle in &mut cycles {
        let delta = if keys.just_pressed(cycle.next_key) {
            1
        } else if keys.just_pressed(cycle.previous_key) {
            -1
        } else if cycle.is_added() {
            0
        } else {
            continue;
        };

        let Some(current) = cycle.step(delta) else {
            continue;
        };

        for &entity in &cycle.objects {
            let Ok((mut visibility, name)) = objects.get_mut(entity) else {
                continue;
            };
            if entity == current {
                *visibility = Visibility::Inherited;
                if delta != 0 {
                    info!(
                        "Showing {}",
                        name.map_or_else(|| entity.to_string(), |n| n.to_string())
                    );
                }
            } else {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

//! Pursuit outcome - что происходит после поимки
//!
//! Detector сам замораживается (см. ai::brain check_capture) и пишет `Captured`.
//! Здесь: Captured → InputBlockRequested → любой компонент с `InputBlockable`.
//!
//! Вместо рефлексии по компонентам ("есть ли у игрока метод BlockInput?")
//! - явная capability: host регистрирует `apply_input_block::<T>` для своих типов.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use crate::ai::Captured;
use crate::SimulationSet;

/// Capability: компонент умеет блокировать ввод
pub trait InputBlockable {
    fn set_input_blocked(&mut self, blocked: bool);
    fn is_input_blocked(&self) -> bool;
}

/// Request: заблокировать/разблокировать ввод entity (катсцены, поимка)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InputBlockRequested {
    pub entity: Entity,
    pub blocked: bool,
}

/// Ворота ввода игрока (host читает перед применением input)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputGate {
    blocked: bool,
}

impl InputBlockable for InputGate {
    fn set_input_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    fn is_input_blocked(&self) -> bool {
        self.blocked
    }
}

/// Marker: ввод entity сейчас заблокирован (для `With<InputBlocked>` фильтров)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InputBlocked;

/// Система: Captured → InputBlockRequested для пойманной цели
pub fn block_input_on_capture(
    mut captures: EventReader<Captured>,
    mut requests: EventWriter<InputBlockRequested>,
) {
    for capture in captures.read() {
        crate::log_info(&format!(
            "Pursuit: {:?} caught by {:?}, blocking input",
            capture.target, capture.detector
        ));
        requests.write(InputBlockRequested {
            entity: capture.target,
            blocked: true,
        });
    }
}

/// Система: InputBlockRequested → T::set_input_blocked + marker InputBlocked
///
/// Регистрируется отдельно для каждого типа с capability.
pub fn apply_input_block<T>(
    mut requests: EventReader<InputBlockRequested>,
    mut blockables: Query<&mut T>,
    mut commands: Commands,
) where
    T: Component<Mutability = Mutable> + InputBlockable,
{
    for request in requests.read() {
        let Ok(mut blockable) = blockables.get_mut(request.entity) else {
            continue;
        };

        blockable.set_input_blocked(request.blocked);
        if request.blocked {
            commands.entity(request.entity).insert(InputBlocked);
        } else {
            commands.entity(request.entity).remove::<InputBlocked>();
        }
    }
}

/// Pursuit Plugin (SimulationSet::Outcome)
///
/// Для собственных InputBlockable-компонентов host добавляет
/// `apply_input_block::<MyInput>` в тот же set после `block_input_on_capture`.
pub struct PursuitPlugin;

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Captured>().add_event::<InputBlockRequested>();

        app.add_systems(
            FixedUpdate,
            (block_input_on_capture, apply_input_block::<InputGate>)
                .chain()
                .in_set(SimulationSet::Outcome),
        );
    }
}

//! Per-tick поведение detector'а.
//!
//! Порядок внутри тика: state update → hearing → vision.
//! Никакого ECS: system собирает входы в `TickContext`, сюда приходят
//! только ссылки, наружу уходят `DetectorSignal`.

use bevy::prelude::*;
use rand::Rng;

use super::components::{
    Detector, DetectorConfig, DetectorSignal, DetectorState, PatrolRoute, WaypointKind,
};
use super::perception::{self, Sighting, TargetView};
use crate::movement::{Dash, NavAgent};
use crate::shared::{flat_direction, rotate_towards, Countdown};
use crate::world::WorldQueries;

/// Тело detector'а (пишем напрямую)
pub struct AgentBody<'a> {
    pub transform: &'a mut Transform,
    pub nav: &'a mut NavAgent,
}

/// Всё, что detector читает за тик
pub struct TickContext<'a> {
    pub delta: f32,
    /// Игровые часы (секунды с начала симуляции)
    pub now: f32,
    pub config: &'a DetectorConfig,
    pub route: Option<&'a PatrolRoute>,
    pub target: &'a TargetView,
    pub queries: &'a WorldQueries,
    /// Попадание луча в цель или её потомка
    pub is_target: &'a dyn Fn(Entity) -> bool,
}

enum DashStep {
    Idle,
    Moving,
    Finished,
}

impl Detector {
    pub fn tick<R: Rng>(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        rng: &mut R,
        signals: &mut Vec<DetectorSignal>,
    ) {
        if self.captured {
            return;
        }

        match self.state {
            DetectorState::Patrol => self.patrol(body, ctx, rng, signals),
            DetectorState::Alerting => self.alerting(body, ctx, signals),
            DetectorState::Chase => self.chase(body, ctx, signals),
        }

        if self.captured {
            return;
        }

        self.listen(body, ctx, signals);
        self.look(body, ctx, signals);
        self.arm_chase_end(ctx);
    }

    // ========================================================================
    // States
    // ========================================================================

    fn patrol<R: Rng>(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        rng: &mut R,
        signals: &mut Vec<DetectorSignal>,
    ) {
        let config = ctx.config;
        body.nav.speed = config.patrol_speed;
        body.nav.update_rotation = true;

        // Пустой маршрут: стоим, сенсоры работают, рывков нет
        let Some(route) = ctx.route.filter(|route| !route.is_empty()) else {
            body.nav.stop();
            return;
        };
        if self.patrol_index >= route.len() {
            self.patrol_index = 0;
        }

        match self.advance_dash(body, ctx.delta, signals) {
            DashStep::Moving => return,
            DashStep::Finished => {
                self.move_to_waypoint(route, body.nav);
                return;
            }
            DashStep::Idle => {}
        }

        if self.route_dirty {
            self.route_dirty = false;
            self.move_to_waypoint(route, body.nav);
        }

        // Стоим на Wait-точке: таймер рывка тоже стоит
        if let Some(wait) = self.waypoint_wait.as_mut() {
            if wait.tick(ctx.delta) {
                self.waypoint_wait = None;
                self.patrol_index = route.next_index(self.patrol_index);
                self.move_to_waypoint(route, body.nav);
            }
            return;
        }

        let arrived = !body.nav.is_path_pending()
            && body.nav.remaining_distance() < config.waypoint_arrival_distance;
        if arrived {
            let kind = route
                .get(self.patrol_index)
                .map(|waypoint| waypoint.kind)
                .unwrap_or_default();

            match kind {
                WaypointKind::Wait { seconds } => {
                    self.waypoint_wait = Some(Countdown::new(seconds));
                    body.nav.stop();
                    return;
                }
                WaypointKind::Normal => {
                    self.patrol_index = route.next_index(self.patrol_index);
                    self.move_to_waypoint(route, body.nav);
                }
            }
        }

        let fire = self
            .patrol_dash
            .get_or_insert_with(|| Countdown::new(roll_patrol_dash_interval(config, rng)))
            .tick(ctx.delta);

        if fire {
            self.patrol_dash = Some(Countdown::new(roll_patrol_dash_interval(config, rng)));

            let forward = body.transform.forward().as_vec3();
            if let Some(direction) = flat_direction(Vec3::ZERO, forward) {
                self.start_dash(
                    body,
                    direction,
                    config.patrol_dash_distance,
                    config.patrol_dash_duration,
                    ctx,
                    signals,
                );
            }
        }
    }

    fn alerting(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) {
        let config = ctx.config;

        if self.check_capture(body, ctx, signals) {
            return;
        }

        if self.seconds_unseen(ctx.now) > config.lose_sight_timeout {
            self.detection = 0.0;
            self.set_state(DetectorState::Patrol, body.nav, signals);
            return;
        }

        if self.reached_threshold(config) {
            self.set_state(DetectorState::Chase, body.nav, signals);
            return;
        }

        body.nav.stop();
        body.nav.update_rotation = false;

        if let Some(point) = self.last_known_position {
            rotate_towards(body.transform, point, config.alert_turn_speed * ctx.delta);
        }
    }

    fn chase(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) {
        let config = ctx.config;

        if self.check_capture(body, ctx, signals) {
            return;
        }

        body.nav.speed = config.chase_speed;
        body.nav.update_rotation = false;

        let target_position = ctx.target.position;
        match self.advance_dash(body, ctx.delta, signals) {
            DashStep::Moving => {}
            DashStep::Idle | DashStep::Finished => {
                body.nav.resume();
                body.nav.set_destination(target_position);
            }
        }

        rotate_towards(body.transform, target_position, config.chase_turn_speed * ctx.delta);

        if self.dash.is_none() {
            let fire = self
                .chase_dash
                .get_or_insert_with(|| Countdown::new(config.chase_dash_interval))
                .tick(ctx.delta);

            if fire {
                self.chase_dash = Some(Countdown::new(config.chase_dash_interval));
                if let Some(direction) = flat_direction(body.transform.translation, target_position)
                {
                    self.start_dash(
                        body,
                        direction,
                        config.chase_dash_distance,
                        config.chase_dash_duration,
                        ctx,
                        signals,
                    );
                }
            }
        }

        // Потеряли цель: decay, на нуле ждём chase_end_wait
        let lost = self.seconds_unseen(ctx.now) > config.lose_sight_timeout;
        if lost {
            self.decay(config.decay_per_second * ctx.delta);
        }

        if !(lost && self.detection <= 0.0) {
            self.chase_end = None;
            return;
        }

        // Взведён в конце прошлого тика (arm_chase_end), тик обнуления не считается
        let finished = self
            .chase_end
            .as_mut()
            .is_some_and(|wait| wait.tick(ctx.delta));
        if finished {
            self.chase_end = None;
            self.detection = 0.0;
            self.set_state(DetectorState::Patrol, body.nav, signals);
        }
    }

    /// Accumulator дошёл до 0 на этом тике (в chase decay или в vision decay)
    /// → отсчёт chase_end_wait начинается со следующего тика
    fn arm_chase_end(&mut self, ctx: &TickContext<'_>) {
        let config = ctx.config;
        if self.state != DetectorState::Chase || self.chase_end.is_some() {
            return;
        }
        if self.detection <= 0.0 && self.seconds_unseen(ctx.now) > config.lose_sight_timeout {
            self.chase_end = Some(Countdown::new(config.chase_end_wait));
        }
    }

    // ========================================================================
    // Sensing
    // ========================================================================

    fn listen(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) {
        if perception::hears_target(body.transform.translation, ctx.config, ctx.target) {
            self.on_heard(
                ctx.target.position,
                ctx.target.stealth.movement_noise(),
                ctx.now,
                ctx.config,
                body.nav,
                signals,
            );
        }
    }

    fn look(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) {
        let config = ctx.config;
        let sighting = perception::observe(
            body.transform,
            config,
            ctx.target,
            ctx.queries.occlusion.as_ref(),
            ctx.is_target,
        );

        match sighting {
            Sighting::Hidden | Sighting::OutOfView => {}
            Sighting::Occluded => {
                if self.state != DetectorState::Patrol {
                    self.decay(config.decay_per_second * ctx.delta);
                }
            }
            Sighting::Visible => {
                let stealth = &ctx.target.stealth;
                let noise_mult = config.noise_multipliers.get(stealth.movement_noise());
                let darkness_mult = config.darkness_multipliers.get(stealth.darkness_level());
                let growth =
                    config.base_detection_per_second * (1.0 + noise_mult) * darkness_mult * ctx.delta;

                self.grow(growth, config);
                self.last_seen_at = Some(ctx.now);
                self.last_known_position = Some(ctx.target.position);

                if self.reached_threshold(config) {
                    self.set_state(DetectorState::Chase, body.nav, signals);
                } else if self.state == DetectorState::Patrol {
                    self.set_state(DetectorState::Alerting, body.nav, signals);
                }
            }
        }
    }

    /// Поимка: в Alerting/Chase, дистанция до коллайдера ≤ attack_distance
    fn check_capture(
        &mut self,
        body: &mut AgentBody<'_>,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) -> bool {
        if self.state == DetectorState::Patrol {
            return false;
        }
        if !perception::within_attack_distance(body.transform.translation, ctx.config, ctx.target) {
            return false;
        }

        self.cancel_dash(body.nav, signals);
        self.waypoint_wait = None;
        self.chase_end = None;
        self.captured = true;
        body.nav.stop();

        signals.push(DetectorSignal::Captured {
            target: ctx.target.entity,
        });
        true
    }

    // ========================================================================
    // Motion helpers
    // ========================================================================

    fn move_to_waypoint(&self, route: &PatrolRoute, nav: &mut NavAgent) {
        if let Some(waypoint) = route.get(self.patrol_index) {
            nav.resume();
            nav.set_destination(waypoint.position);
        }
    }

    fn advance_dash(
        &mut self,
        body: &mut AgentBody<'_>,
        delta: f32,
        signals: &mut Vec<DetectorSignal>,
    ) -> DashStep {
        let Some(dash) = self.dash.as_mut() else {
            return DashStep::Idle;
        };

        body.transform.translation = dash.advance(delta);
        if !dash.is_finished() {
            return DashStep::Moving;
        }

        self.dash = None;
        body.nav.resume();
        signals.push(DetectorSignal::DashFinished { interrupted: false });
        DashStep::Finished
    }

    /// Нет проходимой точки приземления → рывок молча пропускается
    fn start_dash(
        &mut self,
        body: &mut AgentBody<'_>,
        direction: Vec3,
        distance: f32,
        duration: f32,
        ctx: &TickContext<'_>,
        signals: &mut Vec<DetectorSignal>,
    ) {
        let origin = body.transform.translation;
        let Some(dash) = Dash::plan(
            origin,
            direction,
            distance,
            duration,
            ctx.config.dash_sample_radius,
            ctx.queries.navmesh.as_ref(),
        ) else {
            return;
        };

        body.nav.stop();
        signals.push(DetectorSignal::DashStarted {
            from: dash.start(),
            to: dash.end(),
        });
        self.dash = Some(dash);
    }
}

/// [min, max), при вырожденном интервале - min
fn roll_patrol_dash_interval<R: Rng>(config: &DetectorConfig, rng: &mut R) -> f32 {
    let (min, max) = (
        config.patrol_dash_interval_min,
        config.patrol_dash_interval_max,
    );
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

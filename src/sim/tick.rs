//! Per-frame simulation tick
//!
//! Advances the whole game by one variable timestep. Only this module mutates
//! enemies, jutsu instances, score and chakra; input reaches it as queued
//! seals inside [`TickInput`].

use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::boss::{BossKind, SkillEffect, create_boss};
use super::collision::{HitModifiers, sweep};
use super::enemy::{Enemy, create_split_enemies, create_summoned_enemies};
use super::events::{CastRejection, EventSink, GameEvent};
use super::jutsu::{Jutsu, can_release_jutsu, release_jutsu};
use super::mastery::{EXP_BOSS_KILL_BONUS, EXP_KILL_BONUS, EXP_WAVE_CLEAR_BONUS, cast_experience};
use super::rules::Rules;
use super::score::{hit_score, kills_to_advance};
use super::seals::SealSymbol;
use super::state::{GamePhase, GameState, JutsuInstance};
use crate::aim_to_world;
use crate::consts::*;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Seals formed since the last tick, oldest first
    pub seals: Vec<SealSymbol>,
    /// Drop the last seal
    pub undo: bool,
    /// Drop every seal
    pub clear_seals: bool,
    /// Try to release the current sequence
    pub release: bool,
    /// Normalized hand position ([0,1]², y down)
    pub aim: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Start over with the same seed
    pub restart: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, rules: &Rules, input: &TickInput, dt: f32, events: &mut dyn EventSink) {
    if input.restart {
        state.restart(&rules.tuning);
        log::info!("Run restarted (seed {})", state.seed);
        events.emit(GameEvent::Restarted);
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                events.emit(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                events.emit(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let dt = dt.max(0.0);
    state.elapsed += dt;

    handle_seals(state, rules, input, events);
    update_timers(state, dt, events);
    move_entities(state, dt);

    resolve_breaches(state, events);
    if state.lives == 0 {
        end_run(state, events);
        return;
    }

    resolve_hits(state, rules, events);

    // Regen runs at this tick's wave; a new wave's rate applies next tick
    let rate = rules.tuning.regen_rate(state.wave, state.combo.count) * state.buffs.regen_scale();
    advance_wave(state, rules, events);
    spawn_enemies(state, dt, events);
    use_enemy_skills(state, rules, dt, events);

    state.chakra.restore(rate * dt);
}

fn handle_seals(state: &mut GameState, rules: &Rules, input: &TickInput, events: &mut dyn EventSink) {
    let tuning = &rules.tuning;

    if input.clear_seals {
        state.seals.clear();
    }
    if input.undo {
        state.seals.remove();
    }

    for &seal in &input.seals {
        if !state.seals.add(seal) {
            events.emit(GameEvent::SealIgnored { seal });
            continue;
        }
        events.emit(GameEvent::SealFormed {
            seal,
            sequence_len: state.seals.len(),
        });

        if state.seals.is_full() && tuning.auto_release_when_full {
            try_release(state, rules, input.aim, true, events);
        } else if tuning.cast_on_match
            && !rules.catalog.has_extension(state.seals.as_slice(), state.seals.max_len())
        {
            // No longer jutsu can still be formed from these seals
            try_release(state, rules, input.aim, false, events);
        }
    }

    if input.release {
        try_release(state, rules, input.aim, true, events);
    }
}

/// Match the current sequence and release it if chakra and cooldown allow.
///
/// Nothing changes on failure; the sequence is only cleared by a release.
fn try_release(
    state: &mut GameState,
    rules: &Rules,
    aim: Option<Vec2>,
    report_no_match: bool,
    events: &mut dyn EventSink,
) -> bool {
    let seals = state.seals.seals();
    let Some(jutsu) = rules.catalog.match_jutsu(&seals) else {
        if report_no_match && !seals.is_empty() {
            events.emit(GameEvent::CastRejected {
                jutsu_id: None,
                rejection: CastRejection::NoMatch,
            });
        }
        return false;
    };
    // Mastery levels scale damage, cost and cooldown
    let jutsu = state.mastery.apply(jutsu);

    let remaining = state.cooldown_remaining(&jutsu.id);
    if remaining > 0.0 {
        events.emit(GameEvent::CastRejected {
            jutsu_id: Some(jutsu.id.clone()),
            rejection: CastRejection::OnCooldown { remaining },
        });
        return false;
    }

    if !can_release_jutsu(&state.chakra, &jutsu) {
        events.emit(GameEvent::CastRejected {
            jutsu_id: Some(jutsu.id.clone()),
            rejection: CastRejection::InsufficientChakra {
                needed: jutsu.chakra_cost,
                available: state.chakra.current,
            },
        });
        return false;
    }

    state.chakra = release_jutsu(&state.chakra, &jutsu);
    state.seals.clear();
    if jutsu.cooldown > 0.0 {
        state.cooldowns.insert(jutsu.id.clone(), jutsu.cooldown);
    }

    if let Some(buff) = jutsu.buff {
        state.buffs.apply(&buff);
        events.emit(GameEvent::BuffApplied {
            kind: buff.kind,
            duration: buff.duration,
            magnitude: buff.magnitude,
        });
    }

    let instance_id = state.next_entity_id();
    let instance = launch(instance_id, &jutsu, aim, &state.enemies);
    state.jutsu_instances.push(instance);

    state.stats.casts += 1;
    *state.stats.jutsu_used.entry(jutsu.id.clone()).or_insert(0) += 1;
    state.wave_jutsu.insert(jutsu.id.clone());

    log::debug!("Released {} ({} chakra left)", jutsu.id, state.chakra.current);
    events.emit(GameEvent::JutsuReleased {
        jutsu_id: jutsu.id.clone(),
        effect: jutsu.effect,
        instance_id,
        chakra_left: state.chakra.current,
    });
    gain_experience(state, &jutsu.id, cast_experience(state.combo.count), events);
    true
}

/// Fire from the cast origin: at the aimed point, else homing on the nearest
/// hittable enemy, else straight into the scene
fn launch(id: u32, jutsu: &Arc<Jutsu>, aim: Option<Vec2>, enemies: &[Enemy]) -> JutsuInstance {
    let nearest = enemies
        .iter()
        .filter(|e| e.can_be_hit())
        .min_by(|a, b| {
            a.position
                .distance_squared(CAST_ORIGIN)
                .total_cmp(&b.position.distance_squared(CAST_ORIGIN))
        });

    let (target_point, target_id) = match (aim, nearest) {
        (Some(aim), _) => (aim_to_world(aim), None),
        (None, Some(enemy)) => (enemy.position, Some(enemy.id)),
        (None, None) => (Vec3::ZERO, None),
    };

    let dir = (target_point - CAST_ORIGIN).normalize_or(Vec3::NEG_Z);
    let mut instance = JutsuInstance::new(id, Arc::clone(jutsu), CAST_ORIGIN, dir * JUTSU_SPEED);
    instance.target = target_id;
    instance
}

fn update_timers(state: &mut GameState, dt: f32, events: &mut dyn EventSink) {
    for cd in state.cooldowns.values_mut() {
        *cd -= dt;
    }
    state.cooldowns.retain(|_, cd| *cd > 0.0);

    for kind in state.buffs.tick(dt) {
        events.emit(GameEvent::BuffExpired { kind });
    }

    if let Some(lost) = state.combo.decay(dt) {
        log::debug!("Combo of {} dropped", lost);
        events.emit(GameEvent::ComboLost { combo: lost });
    }
}

fn move_entities(state: &mut GameState, dt: f32) {
    for instance in &mut state.jutsu_instances {
        if let Some(target) = instance.target {
            match state.enemies.iter().find(|e| e.id == target && e.can_be_hit()) {
                Some(enemy) => instance.steer_toward(enemy.position),
                None => instance.target = None,
            }
        }
        instance.advance(dt);
    }

    let speed_scale = state.buffs.enemy_speed_scale();
    for enemy in &mut state.enemies {
        enemy.advance(dt, speed_scale);
    }
}

/// Enemies past the defeat line leave the field and cost a life unless a
/// defensive buff soaks it
fn resolve_breaches(state: &mut GameState, events: &mut dyn EventSink) {
    if !state.enemies.iter().any(|e| e.has_breached()) {
        return;
    }

    let blocked = state.buffs.blocks_breach();
    let (breached, remaining): (Vec<Enemy>, Vec<Enemy>) =
        state.enemies.drain(..).partition(|e| e.has_breached());
    state.enemies = remaining;

    for enemy in breached {
        if !blocked {
            state.lives = state.lives.saturating_sub(1);
            state.stats.lives_lost += 1;
        }
        if let Some(explosion) = enemy.explosion {
            events.emit(GameEvent::Exploded {
                enemy_id: enemy.id,
                position: enemy.position,
                damage: explosion.damage,
                radius: explosion.radius,
            });
        }
        events.emit(GameEvent::Breach {
            enemy_id: enemy.id,
            blocked,
            lives_left: state.lives,
        });
    }
}

fn resolve_hits(state: &mut GameState, rules: &Rules, events: &mut dyn EventSink) {
    let tuning = &rules.tuning;
    let modifiers = HitModifiers {
        damage_percent: state.buffs.damage_percent(),
        crit_bonus: state.buffs.crit_bonus(),
        crit_multiplier_percent: tuning.crit_multiplier_percent,
    };

    let hits = sweep(
        &mut state.jutsu_instances,
        &mut state.enemies,
        &modifiers,
        &mut state.rng,
    );

    let window = tuning.combo_window * state.buffs.combo_window_scale();
    let mut children = Vec::new();

    for hit in hits {
        let combo = state.combo.hit(window);
        state.stats.max_combo = state.stats.max_combo.max(combo);

        let (gain, milestone) = hit_score(tuning, combo, state.wave, state.buffs.score_percent());
        state.score += gain + milestone.unwrap_or(0);
        if let Some(bonus) = milestone {
            log::info!("Combo milestone {} (+{})", combo, bonus);
            events.emit(GameEvent::ComboMilestone { combo, bonus });
        }

        let dealt = hit.damage.dealt;
        state.stats.damage_dealt += dealt as u64;
        let lifesteal = state.buffs.lifesteal_percent();
        if lifesteal > 0 {
            state.chakra.restore(dealt as f32 * lifesteal as f32 / 100.0);
        }

        log::debug!("{} hit enemy {} for {}", hit.jutsu.id, hit.enemy_id, dealt);
        events.emit(GameEvent::EnemyHit {
            enemy_id: hit.enemy_id,
            jutsu_id: hit.jutsu.id.clone(),
            damage: dealt,
            critical: hit.critical,
            combo,
            score_gain: gain + milestone.unwrap_or(0),
            shake_amplitude: hit.shake.amplitude,
            shake_duration: hit.shake.duration,
        });

        if !hit.damage.killed {
            continue;
        }

        let dead = state.enemies[hit.enemy_index].clone();
        state.stats.kills += 1;
        state.kills_this_wave += 1;

        if let Some(boss) = &dead.boss {
            state.score += boss.reward;
            state.stats.boss_kills += 1;
            log::info!("Boss {} defeated (+{})", boss.kind.as_str(), boss.reward);
        }

        *state.stats.enemy_kills.entry(dead.kind.as_str().to_string()).or_insert(0) += 1;
        let bonus = if dead.is_boss() { EXP_BOSS_KILL_BONUS } else { EXP_KILL_BONUS };
        gain_experience(state, &hit.jutsu.id, bonus, events);

        events.emit(GameEvent::EnemyKilled {
            enemy_id: dead.id,
            kind: dead.kind,
            position: dead.position,
            color: dead.color,
        });

        if let Some(explosion) = dead.explosion {
            events.emit(GameEvent::Exploded {
                enemy_id: dead.id,
                position: dead.position,
                damage: explosion.damage,
                radius: explosion.radius,
            });
        }

        if dead.can_split() {
            let first = state.reserve_ids(dead.split_count);
            let split = create_split_enemies(&dead, first);
            events.emit(GameEvent::EnemySplit {
                parent_id: dead.id,
                children: split.len() as u32,
            });
            children.extend(split);
        }
    }

    // Next live sets; split children join after the sweep
    state.enemies.retain(|e| e.is_alive());
    state.jutsu_instances.retain(|i| i.active);
    state.enemies.extend(children);
}

fn gain_experience(state: &mut GameState, jutsu_id: &str, amount: u32, events: &mut dyn EventSink) {
    if let Some(level) = state.mastery.add_experience(jutsu_id, amount) {
        log::info!("{} reached mastery level {}", jutsu_id, level);
        events.emit(GameEvent::JutsuLevelUp {
            jutsu_id: jutsu_id.to_string(),
            level,
        });
    }
}

fn advance_wave(state: &mut GameState, rules: &Rules, events: &mut dyn EventSink) {
    let tuning = &rules.tuning;
    if state.kills_this_wave < kills_to_advance(tuning, state.wave) {
        return;
    }
    // A boss wave lasts until its boss falls
    if state.bosses().next().is_some() {
        return;
    }

    for jutsu_id in std::mem::take(&mut state.wave_jutsu) {
        gain_experience(state, &jutsu_id, EXP_WAVE_CLEAR_BONUS, events);
    }

    state.wave += 1;
    state.kills_this_wave = 0;
    state.spawner.set_wave(state.wave);
    log::info!("Wave {} begins", state.wave);
    events.emit(GameEvent::WaveAdvanced { wave: state.wave });

    if state.wave % tuning.boss_wave_interval == 0 {
        let kind = BossKind::for_wave(state.wave, tuning.boss_wave_interval);
        let id = state.next_entity_id();
        let boss = create_boss(id, kind, state.wave);
        log::info!("Boss {} enters on wave {}", kind.as_str(), state.wave);
        events.emit(GameEvent::BossSpawned {
            enemy_id: id,
            boss: kind,
            wave: state.wave,
        });
        state.enemies.push(boss);
    }
}

fn spawn_enemies(state: &mut GameState, dt: f32, events: &mut dyn EventSink) {
    state.spawner.update(dt);
    if !state.spawner.should_spawn() || !state.spawner.can_spawn(&state.enemies) {
        return;
    }

    let id = state.next_entity_id();
    let enemy = state.spawner.spawn(id, &mut state.rng);
    events.emit(GameEvent::EnemySpawned {
        enemy_id: enemy.id,
        kind: enemy.kind,
    });
    state.enemies.push(enemy);
}

/// Summoner cooldowns and boss skills
fn use_enemy_skills(state: &mut GameState, rules: &Rules, dt: f32, events: &mut dyn EventSink) {
    let tuning = &rules.tuning;
    let mut summons: Vec<(usize, u32)> = Vec::new();

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        if let Some(summon) = enemy.summon.as_mut() {
            summon.timer -= dt;
            if summon.timer <= 0.0 {
                summon.timer = summon.cooldown;
                summons.push((index, summon.count));
            }
        }

        let Some(boss) = enemy.boss.as_mut() else {
            continue;
        };
        boss.cool_down(dt);
        let ready = boss.ready_skills();
        if ready.is_empty() {
            continue;
        }

        let choice = rules.boss_brain.choose_skill(enemy, &ready);
        let Some(skill) = choice.and_then(|i| enemy.boss.as_mut().and_then(|b| b.trigger(i))) else {
            continue;
        };

        match skill.effect {
            SkillEffect::Summon => summons.push((index, tuning.boss_summon_count)),
            SkillEffect::Shield => {
                enemy.shield += enemy.max_health * tuning.boss_shield_percent / 100;
            }
            SkillEffect::Projectile | SkillEffect::Area | SkillEffect::Buff => {}
        }

        events.emit(GameEvent::BossSkillUsed {
            boss_id: enemy.id,
            skill_id: skill.id.to_string(),
            effect: skill.effect,
            damage: skill.damage,
            range: skill.range,
        });
    }

    for (index, count) in summons {
        let summoner = state.enemies[index].clone();
        let first = state.reserve_ids(count);
        let minions = create_summoned_enemies(&summoner, count, first);
        events.emit(GameEvent::EnemiesSummoned {
            summoner_id: summoner.id,
            count,
        });
        state.enemies.extend(minions);
    }
}

/// Terminal transition: freeze every clock and report
fn end_run(state: &mut GameState, events: &mut dyn EventSink) {
    state.phase = GamePhase::GameOver;
    state.teardown();
    state.jutsu_instances.clear();
    log::info!("Game over on wave {} with {} points", state.wave, state.score);
    events.emit(GameEvent::GameOver {
        score: state.score,
        wave: state.wave,
    });
}

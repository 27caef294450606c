use std::io::Write;

use skirmish_core::{
    AoeParams, AppConfigExt, Boss, Character, Command, DiceExpr, EnemyGroup,
    EntityDamageOverride, TrackerSignal, TurnOrderEntry, load_snapshot, save_snapshot,
};
use skirmish_types::{DamageModifier, EntityKind, HitStatus, SaveType};

use crate::CliContext;

// ─────────────────────────────────────────────────────────────────────────────
// Roster
// ─────────────────────────────────────────────────────────────────────────────

pub async fn add_character(
    ctx: &CliContext,
    name: String,
    hp: i32,
    initiative: i32,
    ac: Option<i32>,
) -> Result<(), String> {
    let mut character = Character::new("", name, hp, initiative);
    if let Some(ac) = ac {
        character.ac = ac;
    }
    let signals = ctx.tracker.write().await.dispatch(Command::AddCharacter(character));
    report_added(&signals);
    Ok(())
}

pub async fn add_boss(
    ctx: &CliContext,
    name: String,
    hp: i32,
    initiative: i32,
    ac: Option<i32>,
) -> Result<(), String> {
    let mut boss = Boss::new("", name, hp, initiative);
    if let Some(ac) = ac {
        boss.ac = ac;
    }
    let signals = ctx.tracker.write().await.dispatch(Command::AddBoss(boss));
    report_added(&signals);
    Ok(())
}

pub async fn add_group(
    ctx: &CliContext,
    name: String,
    hp: i32,
    count: usize,
    initiative: i32,
    ac: Option<i32>,
) -> Result<(), String> {
    if count == 0 || hp <= 0 {
        return Err("a group needs at least one creature with positive HP".to_string());
    }
    let mut group = EnemyGroup::new("", name, hp, count, initiative);
    if let Some(ac) = ac {
        group.ac = ac;
    }
    let signals = ctx.tracker.write().await.dispatch(Command::AddGroup(group));
    report_added(&signals);
    Ok(())
}

pub async fn duplicate(ctx: &CliContext, id: &str) -> Result<(), String> {
    let signals = ctx
        .tracker
        .write()
        .await
        .dispatch(Command::DuplicateGroup { id: id.to_string() });
    if signals.is_empty() {
        return Err(format!("no group '{id}'"));
    }
    report_added(&signals);
    Ok(())
}

pub async fn remove(ctx: &CliContext, id: &str) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    let kind = tracker
        .state()
        .roster
        .kind_of(id)
        .ok_or_else(|| format!("no entity '{id}'"))?;
    tracker.dispatch(Command::Remove {
        kind,
        id: id.to_string(),
    });
    println!("Removed {kind} {id}");
    Ok(())
}

fn report_added(signals: &[TrackerSignal]) {
    for signal in signals {
        if let TrackerSignal::EntityAdded { kind, id } = signal {
            println!("Added {kind} {id}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Damage
// ─────────────────────────────────────────────────────────────────────────────

pub async fn hit(ctx: &CliContext, id: &str, damage: i32, status: &str) -> Result<(), String> {
    let hit_status: HitStatus = status.parse()?;
    let mut tracker = ctx.tracker.write().await;
    let kind = tracker
        .state()
        .roster
        .kind_of(id)
        .ok_or_else(|| format!("no entity '{id}'"))?;
    let id = id.to_string();
    let command = match kind {
        EntityKind::Character => Command::DamageCharacter {
            id,
            damage,
            hit_status,
        },
        EntityKind::Boss => Command::DamageBoss {
            id,
            damage,
            hit_status,
        },
        EntityKind::Group => Command::DamageGroup {
            id,
            damage,
            hit_status,
        },
    };
    let signals = tracker.dispatch(command);
    print_latest_result(&tracker, &signals);
    Ok(())
}

pub async fn hit_group(ctx: &CliContext, damage: i32, status: &str) -> Result<(), String> {
    let target = {
        let tracker = ctx.tracker.read().await;
        tracker
            .state()
            .selected_target
            .clone()
            .filter(|id| tracker.state().roster.group(id).is_some())
    };
    match target {
        Some(id) => hit(ctx, &id, damage, status).await,
        None => Err("no group selected; use 'next' to reach a group's turn".to_string()),
    }
}

pub async fn damage_group(ctx: &CliContext, id: &str, damage: i32, percent: u32) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    let signals = tracker.apply_damage_to_all_in_group(id, damage, percent);
    print_latest_result(&tracker, &signals);
    Ok(())
}

pub async fn aoe_mark(ctx: &CliContext, ids: &[String], in_aoe: bool) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    if ids.is_empty() && !in_aoe {
        tracker.dispatch(Command::ClearAllAoe);
        println!("Cleared all AoE flags");
        return Ok(());
    }
    for id in ids {
        let Some(kind) = tracker.state().roster.kind_of(id) else {
            println!("Skipping unknown '{id}'");
            continue;
        };
        tracker.dispatch(Command::SetInAoe {
            kind,
            id: id.clone(),
            in_aoe,
        });
    }
    Ok(())
}

/// Arguments of the `aoe` command before validation.
pub struct AoeRequest {
    pub damage: i32,
    pub save: Option<String>,
    pub dc: Option<i32>,
    pub half_on_save: bool,
    pub apply_to_all: bool,
    pub overrides: Vec<String>,
}

pub async fn aoe(ctx: &CliContext, request: AoeRequest) -> Result<(), String> {
    let mut params = AoeParams::new(request.damage).half_on_save(request.half_on_save);
    match (request.save, request.dc) {
        (Some(save), Some(dc)) => {
            let save_type: SaveType = save.parse()?;
            params = params.with_save(save_type, dc);
        }
        (None, None) => {}
        _ => return Err("--save and --dc go together".to_string()),
    }

    let mut tracker = ctx.tracker.write().await;
    for raw in &request.overrides {
        let (id, value) = parse_override(raw)?;
        let kind = tracker
            .state()
            .roster
            .kind_of(id)
            .ok_or_else(|| format!("no entity '{id}'"))?;
        params = params.with_override(kind, id, value);
    }

    if request.apply_to_all {
        match tracker.apply_damage_to_all_groups_in_aoe_internal(params.apply_to_all()) {
            Some(summary) => println!("{summary}"),
            None => println!("Nothing was hit"),
        }
        return Ok(());
    }

    let signals = tracker.apply_aoe(params);
    if signals.is_empty() {
        println!("Nothing was hit");
    }
    print_latest_result(&tracker, &signals);
    Ok(())
}

/// `<id>=<save|fail>[@total][:half|quarter|none|full][:+N|-N][:dmg=N]`
fn parse_override(raw: &str) -> Result<(&str, EntityDamageOverride), String> {
    let (id, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("override '{raw}' needs <id>=<save|fail>"))?;
    let mut parts = rest.split(':');
    let outcome = parts.next().unwrap_or_default();
    let (verdict, total) = match outcome.split_once('@') {
        Some((verdict, total)) => (
            verdict,
            total
                .parse::<i32>()
                .map_err(|_| format!("bad save total in '{raw}'"))?,
        ),
        None => (outcome, 0),
    };
    let succeeded = match verdict {
        "save" | "pass" => true,
        "fail" => false,
        other => return Err(format!("expected save or fail, got '{other}'")),
    };

    let mut value = EntityDamageOverride {
        succeeded,
        roll: total,
        total_roll: total,
        modifier: if succeeded {
            DamageModifier::Half
        } else {
            DamageModifier::Full
        },
        ..Default::default()
    };
    for part in parts {
        match part {
            "half" => value.modifier = DamageModifier::Half,
            "quarter" => value.modifier = DamageModifier::Quarter,
            "none" => value.modifier = DamageModifier::None,
            "full" => value.modifier = DamageModifier::Full,
            _ => {
                if let Some(custom) = part.strip_prefix("dmg=") {
                    value.custom_damage =
                        Some(custom.parse().map_err(|_| format!("bad damage in '{raw}'"))?);
                } else {
                    value.adjustment = part
                        .parse()
                        .map_err(|_| format!("unknown override part '{part}'"))?;
                }
            }
        }
    }
    Ok((id, value))
}

// ─────────────────────────────────────────────────────────────────────────────
// Healing
// ─────────────────────────────────────────────────────────────────────────────

pub async fn heal(ctx: &CliContext, id: &str, amount: i32, full: bool) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    let kind = tracker
        .state()
        .roster
        .kind_of(id)
        .ok_or_else(|| format!("no entity '{id}'"))?;
    let command = if full {
        if kind != EntityKind::Group {
            return Err("--full only applies to groups".to_string());
        }
        Command::HealGroupToFull { id: id.to_string() }
    } else {
        Command::Heal {
            kind,
            id: id.to_string(),
            amount,
        }
    };
    let signals = tracker.dispatch(command);
    if signals.is_empty() {
        println!("Nothing to heal");
    }
    print_latest_result(&tracker, &signals);
    Ok(())
}

pub async fn temp_hp(ctx: &CliContext, id: &str, amount: i32, replace: bool) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    let kind = tracker
        .state()
        .roster
        .kind_of(id)
        .ok_or_else(|| format!("no entity '{id}'"))?;
    let signals = tracker.dispatch(Command::SetTempHp {
        kind,
        id: id.to_string(),
        amount,
        replace,
    });
    print_latest_result(&tracker, &signals);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Turns
// ─────────────────────────────────────────────────────────────────────────────

pub async fn next_turn(ctx: &CliContext) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    tracker.next_turn();
    print_current(&tracker);
    Ok(())
}

pub async fn previous_turn(ctx: &CliContext) -> Result<(), String> {
    let mut tracker = ctx.tracker.write().await;
    tracker.previous_turn();
    print_current(&tracker);
    Ok(())
}

fn print_current(tracker: &skirmish_core::Tracker) {
    let turn = &tracker.state().turn;
    match turn.current() {
        Some(entry) => {
            print!("Round {} - {}", turn.round, entry.name());
            if let Some(target) = &tracker.state().selected_target {
                print!(" (target {target})");
            }
            println!();
        }
        None => println!("Nobody in the turn order"),
    }
}

pub async fn show_order(ctx: &CliContext) -> Result<(), String> {
    let tracker = ctx.tracker.read().await;
    let state = tracker.state();
    if state.turn.entries.is_empty() {
        println!("Nobody in the turn order");
        return Ok(());
    }

    println!("Round {}", state.turn.round);
    println!("{:<3}{:>5}  {:<30} HP", "", "Init", "Name");
    println!("{}", "-".repeat(60));
    for (idx, entry) in state.turn.entries.iter().enumerate() {
        let marker = if idx == state.turn.current_index { ">" } else { "" };
        match entry {
            TurnOrderEntry::Character { id, name, initiative } => {
                let hp = state
                    .roster
                    .character(id)
                    .map(|c| format!("{}/{} (+{})", c.current_hp, c.max_hp, c.temp_hp))
                    .unwrap_or_default();
                println!("{marker:<3}{initiative:>5}  {name:<30} {hp}");
            }
            TurnOrderEntry::Boss { id, name, initiative } => {
                let hp = state
                    .roster
                    .boss(id)
                    .map(|b| format!("{}/{} (+{})", b.current_hp, b.max_hp, b.temp_hp))
                    .unwrap_or_default();
                println!("{marker:<3}{initiative:>5}  {name:<30} {hp}");
            }
            TurnOrderEntry::GroupCollection(collection) => {
                println!(
                    "{marker:<3}{:>5}  {:<30} {}/{} alive",
                    collection.initiative,
                    collection.name,
                    collection.total_count,
                    collection.total_original_count
                );
                for member in &collection.groups {
                    println!(
                        "{:<10}{:<28} {}/{} alive, avg {}/{} [{}]",
                        "",
                        member.name,
                        member.count,
                        member.original_count,
                        member.current_hp,
                        member.max_hp,
                        member.id
                    );
                }
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

fn print_latest_result(tracker: &skirmish_core::Tracker, signals: &[TrackerSignal]) {
    let logged = signals
        .iter()
        .rev()
        .find_map(|s| match s {
            TrackerSignal::ResultLogged { id } => Some(*id),
            _ => None,
        });
    if let Some(result) = logged.and_then(|id| tracker.state().results.get(id)) {
        println!("{}", result.message);
    }
}

pub async fn show_results(ctx: &CliContext, limit: usize) -> Result<(), String> {
    let tracker = ctx.tracker.read().await;
    let entries = tracker.state().results.entries();
    if entries.is_empty() {
        println!("No results");
        return Ok(());
    }
    let skip = entries.len().saturating_sub(limit);
    for result in &entries[skip..] {
        println!(
            "[{}] #{} {}",
            result.timestamp.format("%H:%M:%S"),
            result.id,
            result.message
        );
    }
    Ok(())
}

pub async fn clear_results(ctx: &CliContext) -> Result<(), String> {
    ctx.tracker.write().await.dispatch(Command::ClearResults);
    println!("Results cleared");
    Ok(())
}

pub async fn roll(ctx: &CliContext, expr: &str) -> Result<(), String> {
    let expr = DiceExpr::parse(expr).map_err(|e| e.to_string())?;
    let rolled = ctx.tracker.write().await.roll(&expr);
    println!("{expr}: {:?} = {}", rolled.rolls, rolled.total);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Files & Settings
// ─────────────────────────────────────────────────────────────────────────────

pub async fn save(ctx: &CliContext, path: Option<&str>) -> Result<(), String> {
    let path = ctx.resolve_snapshot_path(path).await?;
    let snapshot = ctx.tracker.read().await.snapshot();
    save_snapshot(&path, &snapshot).map_err(|e| e.to_string())?;
    println!("Saved {}", path.display());
    Ok(())
}

pub async fn load(ctx: &CliContext, path: Option<&str>) -> Result<(), String> {
    let path = ctx.resolve_snapshot_path(path).await?;
    let snapshot = load_snapshot(&path).map_err(|e| e.to_string())?;
    let mut tracker = ctx.tracker.write().await;
    tracker.restore(snapshot);
    println!(
        "Loaded {} ({} entities)",
        path.display(),
        tracker.state().roster.len()
    );
    Ok(())
}

pub async fn show_settings(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    if let Ok(path) = skirmish_core::AppConfig::config_path() {
        println!("Config file:      {}", path.display());
    }
    match config.snapshot_path() {
        Ok(path) => println!("Snapshot:         {}", path.display()),
        Err(err) => println!("Snapshot:         unavailable ({err})"),
    }
    println!("Autosave:         {}", config.autosave);
    println!("Half on save:     {}", config.default_half_on_save);
    println!("Max results:      {}", config.max_results);
    match config.rng_seed {
        Some(seed) => println!("Dice seed:        {seed}"),
        None => println!("Dice seed:        random"),
    }
    Ok(())
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "quitting...");
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_defaults_follow_verdict() {
        let (id, saved) = parse_override("g1=save@17").unwrap();
        assert_eq!(id, "g1");
        assert!(saved.succeeded);
        assert_eq!(saved.total_roll, 17);
        assert_eq!(saved.modifier, DamageModifier::Half);

        let (_, failed) = parse_override("c2=fail").unwrap();
        assert!(!failed.succeeded);
        assert_eq!(failed.modifier, DamageModifier::Full);
    }

    #[test]
    fn override_parts() {
        let (_, value) = parse_override("b1=save:quarter:+2").unwrap();
        assert_eq!(value.modifier, DamageModifier::Quarter);
        assert_eq!(value.adjustment, 2);

        let (_, value) = parse_override("b1=fail:dmg=9").unwrap();
        assert_eq!(value.custom_damage, Some(9));
    }

    #[test]
    fn override_rejects_garbage() {
        assert!(parse_override("g1").is_err());
        assert!(parse_override("g1=maybe").is_err());
        assert!(parse_override("g1=save:lots").is_err());
    }
}

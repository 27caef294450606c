use clap::{Parser, Subcommand};
use skirmish_cli::CliContext;
use skirmish_cli::commands;
use skirmish_cli::logging;
use skirmish_cli::readline;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Tabletop combat tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a player character
    AddCharacter {
        name: String,
        #[arg(long)]
        hp: i32,
        #[arg(long, default_value_t = 0)]
        init: i32,
        #[arg(long)]
        ac: Option<i32>,
    },
    /// Add a single large monster
    AddBoss {
        name: String,
        #[arg(long)]
        hp: i32,
        #[arg(long, default_value_t = 0)]
        init: i32,
        #[arg(long)]
        ac: Option<i32>,
    },
    /// Add a group of identical monsters
    AddGroup {
        name: String,
        /// HP per creature
        #[arg(long)]
        hp: i32,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        init: i32,
        #[arg(long)]
        ac: Option<i32>,
    },
    /// Copy a group at full HP under the next free number
    Duplicate { id: String },
    Remove { id: String },
    /// Single-target attack on any entity
    Hit {
        id: String,
        damage: i32,
        #[arg(long, default_value = "hit")]
        status: String,
    },
    /// Single-target attack on the selected group
    HitGroup {
        damage: i32,
        #[arg(long, default_value = "hit")]
        status: String,
    },
    /// Damage a share of a group's living creatures
    DamageGroup {
        id: String,
        damage: i32,
        #[arg(long, default_value_t = 100)]
        percent: u32,
    },
    /// Flag entities as caught in the next area effect
    AoeMark {
        ids: Vec<String>,
        /// Clear flags instead of setting them
        #[arg(long)]
        clear: bool,
    },
    /// Resolve an area effect against flagged entities
    Aoe {
        damage: i32,
        /// Save ability (str, dex, con, int, wis, cha)
        #[arg(long)]
        save: Option<String>,
        #[arg(long)]
        dc: Option<i32>,
        /// Successful saves take no damage instead of half
        #[arg(long)]
        no_half: bool,
        /// Hit every group, flagged or not
        #[arg(long)]
        all: bool,
        /// Externally rolled save: <id>=<save|fail>[@total][:half|quarter|none|full][:+N|-N][:dmg=N]
        #[arg(long = "override")]
        overrides: Vec<String>,
    },
    Heal {
        id: String,
        #[arg(default_value_t = 0)]
        amount: i32,
        /// Restore a whole group, fallen creatures included
        #[arg(long)]
        full: bool,
    },
    TempHp {
        id: String,
        amount: i32,
        /// Stack onto existing temp HP instead of replacing it
        #[arg(long)]
        add: bool,
    },
    Next,
    Prev,
    Order,
    Results {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    ClearResults,
    /// Roll dice notation, e.g. 2d6+3
    Roll { expr: String },
    Save { path: Option<String> },
    Load { path: Option<String> },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "skirmish".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::AddCharacter { name, hp, init, ac }) => {
            commands::add_character(ctx, name, hp, init, ac).await
        }
        Some(Commands::AddBoss { name, hp, init, ac }) => {
            commands::add_boss(ctx, name, hp, init, ac).await
        }
        Some(Commands::AddGroup {
            name,
            hp,
            count,
            init,
            ac,
        }) => commands::add_group(ctx, name, hp, count, init, ac).await,
        Some(Commands::Duplicate { id }) => commands::duplicate(ctx, &id).await,
        Some(Commands::Remove { id }) => commands::remove(ctx, &id).await,
        Some(Commands::Hit { id, damage, status }) => commands::hit(ctx, &id, damage, &status).await,
        Some(Commands::HitGroup { damage, status }) => {
            commands::hit_group(ctx, damage, &status).await
        }
        Some(Commands::DamageGroup {
            id,
            damage,
            percent,
        }) => commands::damage_group(ctx, &id, damage, percent).await,
        Some(Commands::AoeMark { ids, clear }) => commands::aoe_mark(ctx, &ids, !clear).await,
        Some(Commands::Aoe {
            damage,
            save,
            dc,
            no_half,
            all,
            overrides,
        }) => {
            let request = commands::AoeRequest {
                damage,
                save,
                dc,
                half_on_save: !no_half,
                apply_to_all: all,
                overrides,
            };
            commands::aoe(ctx, request).await
        }
        Some(Commands::Heal { id, amount, full }) => commands::heal(ctx, &id, amount, full).await,
        Some(Commands::TempHp { id, amount, add }) => {
            commands::temp_hp(ctx, &id, amount, !add).await
        }
        Some(Commands::Next) => commands::next_turn(ctx).await,
        Some(Commands::Prev) => commands::previous_turn(ctx).await,
        Some(Commands::Order) => commands::show_order(ctx).await,
        Some(Commands::Results { limit }) => commands::show_results(ctx, limit).await,
        Some(Commands::ClearResults) => commands::clear_results(ctx).await,
        Some(Commands::Roll { expr }) => commands::roll(ctx, &expr).await,
        Some(Commands::Save { path }) => commands::save(ctx, path.as_deref()).await,
        Some(Commands::Load { path }) => commands::load(ctx, path.as_deref()).await,
        Some(Commands::Config) => commands::show_settings(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => Ok(()),
    }?;
    Ok(false)
}

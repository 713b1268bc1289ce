#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use permanence::{
    generate,
    io::{self, parse_date, parse_dates},
    model::{Snapshot, StaffMember, YearMonth},
    storage::{JsonStorage, Storage},
    GenerateOptions,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de tableaux de permanence (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des entrées (mois, personnel, jours fériés)
    #[arg(long, global = true, default_value = "snapshot.json")]
    state: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Choisir le mois cible (YYYY-MM)
    SetMonth {
        #[arg(long)]
        month: String,
    },

    /// Ajouter une personne
    AddStaff {
        #[arg(long)]
        name: String,
        /// Nombre de permanences visées en semaine
        #[arg(long, default_value_t = 0)]
        weekday: u32,
        /// Nombre de permanences visées les jours fériés / week-ends
        #[arg(long, default_value_t = 0)]
        holiday: u32,
    },

    /// Modifier une personne
    UpdateStaff {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        weekday: Option<u32>,
        #[arg(long)]
        holiday: Option<u32>,
    },

    /// Retirer une personne
    RemoveStaff {
        #[arg(long)]
        name: String,
    },

    /// Marquer des jours indisponibles ("2025-10-03,2025-10-04")
    Unavailable {
        #[arg(long)]
        name: String,
        #[arg(long)]
        dates: String,
        /// Retire les dates au lieu de les ajouter
        #[arg(long)]
        clear: bool,
    },

    /// Marquer des jours souhaités
    Prefer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        dates: String,
        #[arg(long)]
        clear: bool,
    },

    /// Ajouter un jour férié
    AddHoliday {
        #[arg(long)]
        date: String,
    },

    /// Retirer un jour férié
    RemoveHoliday {
        #[arg(long)]
        date: String,
    },

    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des jours fériés depuis un CSV
    ImportHolidays {
        #[arg(long)]
        csv: String,
    },

    /// Afficher les entrées
    List,

    /// Générer les variantes et optionnellement exporter
    Generate {
        #[arg(long, default_value_t = 3)]
        patterns: usize,
        /// Graine de base (rejouable)
        #[arg(long)]
        seed: Option<u64>,
        /// Ajoute le bruit d'affichage aux notes
        #[arg(long)]
        jitter: bool,
        /// Calcule les variantes l'une après l'autre
        #[arg(long)]
        sequential: bool,
        /// Variante à exporter (1-based)
        #[arg(long, default_value_t = 1)]
        pattern: usize,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_tsv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.state)?;
    let mut snapshot = if storage.exists() {
        storage.load()?
    } else {
        let today = Local::now().date_naive();
        Snapshot::new(YearMonth::new(today.year(), today.month())?)
    };

    match cli.cmd {
        Commands::SetMonth { month } => {
            snapshot.set_month(month.parse()?);
            storage.save(&snapshot)?;
        }
        Commands::AddStaff {
            name,
            weekday,
            holiday,
        } => {
            snapshot.add_staff(StaffMember::new(name, weekday, holiday))?;
            storage.save(&snapshot)?;
        }
        Commands::UpdateStaff {
            name,
            rename,
            weekday,
            holiday,
        } => {
            if let Some(new_name) = &rename {
                if new_name != &name && snapshot.find_staff_by_name(new_name).is_some() {
                    bail!("staff already registered: {new_name}");
                }
            }
            let member = snapshot
                .find_staff_mut_by_name(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown staff: {}", name))?;
            if let Some(n) = rename {
                member.name = n;
            }
            if let Some(w) = weekday {
                member.target_weekday_count = w;
            }
            if let Some(h) = holiday {
                member.target_holiday_count = h;
            }
            storage.save(&snapshot)?;
        }
        Commands::RemoveStaff { name } => {
            if snapshot.remove_staff(&name).is_none() {
                bail!("unknown staff: {name}");
            }
            storage.save(&snapshot)?;
        }
        Commands::Unavailable { name, dates, clear } => {
            let dates = parse_dates(&dates)?;
            let member = snapshot
                .find_staff_mut_by_name(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown staff: {}", name))?;
            for d in dates {
                if clear {
                    member.unavailability.remove(&d);
                } else {
                    member.mark_unavailable(d);
                }
            }
            storage.save(&snapshot)?;
        }
        Commands::Prefer { name, dates, clear } => {
            let dates = parse_dates(&dates)?;
            let member = snapshot
                .find_staff_mut_by_name(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown staff: {}", name))?;
            for d in dates {
                if clear {
                    member.preferences.remove(&d);
                } else {
                    member.mark_preferred(d);
                }
            }
            storage.save(&snapshot)?;
        }
        Commands::AddHoliday { date } => {
            snapshot.add_holiday(parse_date(&date)?);
            storage.save(&snapshot)?;
        }
        Commands::RemoveHoliday { date } => {
            if !snapshot.remove_holiday(parse_date(&date)?) {
                bail!("not a registered holiday: {date}");
            }
            storage.save(&snapshot)?;
        }
        Commands::ImportStaff { csv } => {
            for member in io::import_staff_csv(csv)? {
                snapshot.add_staff(member)?;
            }
            storage.save(&snapshot)?;
        }
        Commands::ImportHolidays { csv } => {
            snapshot.holidays.extend(io::import_holidays_csv(csv)?);
            storage.save(&snapshot)?;
        }
        Commands::List => {
            println!("month: {}", snapshot.month);
            for s in &snapshot.staff {
                println!(
                    "{} | weekday {} | holiday {} | unavailable {} | preferred {}",
                    s.name,
                    s.target_weekday_count,
                    s.target_holiday_count,
                    s.unavailability.len(),
                    s.preferences.len()
                );
            }
            let holidays: Vec<String> = snapshot.holidays.iter().map(|d| d.to_string()).collect();
            println!("holidays: {}", holidays.join(", "));
        }
        Commands::Generate {
            patterns,
            seed,
            jitter,
            sequential,
            pattern,
            out_csv,
            out_tsv,
            out_json,
        } => {
            let opts = GenerateOptions {
                pattern_count: patterns,
                seed,
                score_jitter: jitter,
                parallel: !sequential,
                ..GenerateOptions::default()
            };
            let results = generate(&snapshot, &opts)?;

            for r in &results {
                println!(
                    "{} | score {} | {} violation(s)",
                    r.pattern_id,
                    r.display_score(),
                    r.violations.len()
                );
            }
            if let Some(seed) = results.first().and_then(|r| r.seed) {
                println!("seed: {seed}");
            }

            if out_csv.is_some() || out_tsv.is_some() {
                let selected = pattern
                    .checked_sub(1)
                    .and_then(|i| results.get(i))
                    .with_context(|| {
                        format!("no pattern {pattern} (generated {})", results.len())
                    })?;
                if let Some(path) = out_csv {
                    io::export_result_csv_to_path(path, &snapshot, selected)?;
                }
                if let Some(path) = out_tsv {
                    std::fs::write(path, io::clipboard_text(&snapshot, selected))?;
                }
            }
            if let Some(path) = out_json {
                io::export_results_json(path, &results)?;
            }
        }
    }

    Ok(())
}

//! Horserace CLI - Command-line interface for horse racing signal analysis

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use horserace::core::bloodline::{get_distance_category, BloodlineAnalyzer};
use horserace::core::burden::{
    analyze_historical_burden, compare_burden_advantage, BurdenAnalyzer,
};
use horserace::core::combo::{
    filter_synergistic_combos, rank_combos, summarize_combo_stats, to_jockey_trainer_combo,
    ComboAnalysis, ComboAnalyzer, ComboFilter, ComboSortKey, SortOrder, SynergyGrade,
};
use horserace::data::sire_db::{install_sire_database, sire_database, SireDatabase};
use horserace::error::validate_weight_pair;
use horserace::{
    AnalyzerConfig, BurdenHistoryEntry, ComboExtras, ComboStats, Reliability, RunnerInput,
    SignalAdapter, Surface,
};

#[derive(Parser)]
#[command(name = "horserace")]
#[command(author, version, about = "Horse racing signal analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Analyzer configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sire knowledge base file (JSON), replaces the embedded table
    #[arg(long, global = true)]
    sires: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze bloodline aptitude
    Bloodline {
        /// Horse name
        #[arg(long, default_value = "")]
        horse: String,

        #[arg(long)]
        sire: Option<String>,

        #[arg(long)]
        dam: Option<String>,

        /// Maternal grandsire
        #[arg(long)]
        grandsire: Option<String>,

        /// Race distance in meters (for race fit)
        #[arg(short, long)]
        distance: Option<u32>,

        /// Track surface: dirt or turf (for race fit)
        #[arg(short, long)]
        surface: Option<String>,
    },

    /// Analyze burden weight fit
    Burden {
        #[arg(long, default_value = "")]
        horse: String,

        /// Assigned burden (kg)
        #[arg(short, long)]
        burden: f64,

        /// Horse body weight (kg)
        #[arg(short, long)]
        weight: f64,

        /// Horse age (younger horses get a lower optimal ratio)
        #[arg(long)]
        age: Option<u8>,

        /// Burdens of the other runners, comma separated
        #[arg(long, value_delimiter = ',')]
        opponents: Vec<f64>,
    },

    /// Analyze burden against past results (JSON array of races)
    History {
        file: PathBuf,
    },

    /// Analyze a single jockey-trainer combo
    Combo {
        /// Combo id ("<jockeyId>-<trainerId>")
        #[arg(long)]
        id: String,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        starts: u32,

        #[arg(long)]
        wins: u32,

        /// Jockey average win rate (%)
        #[arg(long)]
        jockey_avg: f64,

        /// Trainer average win rate (%)
        #[arg(long)]
        trainer_avg: f64,

        #[arg(long)]
        seconds: Option<u32>,

        #[arg(long)]
        thirds: Option<u32>,

        /// Recent finishing positions, oldest first, comma separated
        #[arg(long, value_delimiter = ',')]
        form: Vec<u32>,

        /// Meet code (1 서울, 2 제주, 3 부산경남)
        #[arg(long)]
        meet: Option<String>,
    },

    /// Filter, rank and summarize combos (JSON array of combo records)
    Combos {
        file: PathBuf,

        #[arg(long)]
        min_starts: Option<u32>,

        #[arg(long)]
        min_win_rate: Option<f64>,

        /// Minimum grade (S, A, B, C, D)
        #[arg(long)]
        grade: Option<String>,

        /// Sort key: synergy, win_rate, starts, uplift
        #[arg(long, default_value = "synergy")]
        sort: String,

        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Number of combos to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Compute predictor signals for runners (JSON array of runner inputs)
    Signals {
        file: PathBuf,
    },

    /// List the sire knowledge base
    Sires,
}

/// Combo record in a population file
#[derive(Deserialize)]
struct ComboRecord {
    #[serde(flatten)]
    stats: ComboStats,
    jockey_avg_win_rate: f64,
    trainer_avg_win_rate: f64,
    #[serde(default)]
    extras: ComboExtras,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = match &cli.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(path) = &cli.sires {
        let db = SireDatabase::from_json_file(path)
            .with_context(|| format!("Failed to load sire table from {:?}", path))?;
        install_sire_database(db)?;
    }
    let db = sire_database();

    match cli.command {
        Commands::Bloodline {
            horse,
            sire,
            dam,
            grandsire,
            distance,
            surface,
        } => {
            let surface = surface.as_deref().map(parse_surface).transpose()?;
            run_bloodline(
                db,
                &config,
                &horse,
                sire.as_deref(),
                dam.as_deref(),
                grandsire.as_deref(),
                distance,
                surface,
                cli.json,
            )?;
        }
        Commands::Burden {
            horse,
            burden,
            weight,
            age,
            opponents,
        } => {
            validate_weight_pair(burden, weight)?;
            run_burden(&config, &horse, burden, weight, age, &opponents, cli.json)?;
        }
        Commands::History { file } => {
            run_history(&file, cli.json)?;
        }
        Commands::Combo {
            id,
            name,
            starts,
            wins,
            jockey_avg,
            trainer_avg,
            seconds,
            thirds,
            form,
            meet,
        } => {
            if wins > starts {
                bail!("Wins ({}) cannot exceed starts ({})", wins, starts);
            }
            let stats = ComboStats {
                id,
                name,
                starts,
                wins,
                rate: 0.0,
            };
            let extras = ComboExtras {
                seconds,
                thirds,
                recent_form: form,
            };
            run_combo(&config, &stats, jockey_avg, trainer_avg, &extras, meet.as_deref(), cli.json)?;
        }
        Commands::Combos {
            file,
            min_starts,
            min_win_rate,
            grade,
            sort,
            order,
            top,
        } => {
            let synergy_grade = match grade {
                Some(g) => Some(
                    SynergyGrade::parse(&g)
                        .with_context(|| format!("Unknown grade: {}. Use S, A, B, C or D", g))?,
                ),
                None => None,
            };
            let sort_by = ComboSortKey::parse(&sort).with_context(|| {
                format!("Unknown sort key: {}. Use synergy, win_rate, starts or uplift", sort)
            })?;
            let order = SortOrder::parse(&order)
                .with_context(|| format!("Unknown order: {}. Use asc or desc", order))?;
            let filter = ComboFilter {
                min_starts,
                min_win_rate,
                synergy_grade,
            };
            run_combos(&config, &file, &filter, sort_by, order, top, cli.json)?;
        }
        Commands::Signals { file } => {
            run_signals(db, &config, &file, cli.json)?;
        }
        Commands::Sires => {
            list_sires(db, cli.json)?;
        }
    }

    Ok(())
}

fn parse_surface(s: &str) -> Result<Surface> {
    Surface::parse(s).with_context(|| format!("Unknown surface: {}. Use dirt or turf", s))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn reliability_label(reliability: Reliability) -> String {
    match reliability {
        Reliability::High => "high".green().to_string(),
        Reliability::Medium => "medium".yellow().to_string(),
        Reliability::Low => "low".red().to_string(),
    }
}

fn grade_label(grade: SynergyGrade) -> String {
    match grade {
        SynergyGrade::S => "S".magenta().bold().to_string(),
        SynergyGrade::A => "A".green().bold().to_string(),
        SynergyGrade::B => "B".cyan().to_string(),
        SynergyGrade::C => "C".yellow().to_string(),
        SynergyGrade::D => "D".red().to_string(),
    }
}

fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        name.chars().take(max_chars).collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn run_bloodline(
    db: &SireDatabase,
    config: &AnalyzerConfig,
    horse: &str,
    sire: Option<&str>,
    dam: Option<&str>,
    grandsire: Option<&str>,
    distance: Option<u32>,
    surface: Option<Surface>,
    json: bool,
) -> Result<()> {
    let analyzer = BloodlineAnalyzer::new(db, config.bloodline);
    let analysis = analyzer.analyze(horse, sire, dam, grandsire);
    let fit = match (distance, surface) {
        (Some(d), Some(s)) => Some(analysis.race_fit(d, s)),
        _ => None,
    };

    if json {
        return print_json(&serde_json::json!({ "analysis": analysis, "race_fit": fit }));
    }

    println!("{}", "혈통 분석 (Bloodline Analysis):".yellow().bold());
    println!("  Horse:             {}", analysis.horse_name);
    println!("  Sire:              {}", analysis.sire.as_deref().unwrap_or("-"));
    println!("  Distance aptitude: {} ({})", analysis.distance_aptitude, analysis.distance_category().as_str());
    println!("  Dirt / Turf:       {} / {}", analysis.dirt_aptitude, analysis.turf_aptitude);
    println!("  Optimal distance:  {}m", analysis.optimal_distance);
    println!("  Reliability:       {}", reliability_label(analysis.reliability));
    println!();
    for reason in &analysis.reasoning {
        println!("  - {}", reason.dimmed());
    }

    if let (Some(fit), Some(d), Some(s)) = (fit, distance, surface) {
        println!();
        println!(
            "{} {}m ({}) / {}",
            "Race fit:".yellow().bold(),
            d,
            get_distance_category(d).as_str(),
            s
        );
        println!("  Distance fit: {:>5.1}", fit.distance_fit);
        println!("  Surface fit:  {:>5.1}", fit.surface_fit);
        println!("  Overall:      {:>5.1}", fit.overall);
    }

    Ok(())
}

fn run_burden(
    config: &AnalyzerConfig,
    horse: &str,
    burden: f64,
    weight: f64,
    age: Option<u8>,
    opponents: &[f64],
    json: bool,
) -> Result<()> {
    let analyzer = BurdenAnalyzer::new(config.burden.clone());
    let analysis = analyzer.analyze_with_age(horse, burden, weight, age);
    let optimization = analyzer.optimize_burden(burden, weight);
    let advantage = compare_burden_advantage(burden, opponents);

    if json {
        return print_json(&serde_json::json!({
            "analysis": analysis,
            "optimization": optimization,
            "field_advantage": advantage,
        }));
    }

    println!("{}", "부담중량 분석 (Burden Analysis):".yellow().bold());
    println!("  Burden / Weight: {:.1}kg / {:.0}kg", analysis.burden_weight, analysis.horse_weight);
    println!(
        "  Burden ratio:    {:.2}% (optimal {:.1}%)",
        analysis.burden_ratio, analysis.optimal_ratio
    );
    println!("  Assessment:      {}", analysis.assessment);
    println!("  Fit score:       {:.1}", analysis.fit_score);
    println!("  Expected impact: {:+.1} lengths", analysis.expected_impact);
    println!();
    println!("  Optimal burden:  {:.0}kg ({:+.1}kg)", optimization.optimal_burden, optimization.difference);
    println!("  {}", optimization.recommendation.to_string().cyan());

    if !opponents.is_empty() {
        println!("  Field advantage: {:.1} (vs {} runners)", advantage, opponents.len());
    }

    Ok(())
}

fn run_history(file: &Path, json: bool) -> Result<()> {
    let history: Vec<BurdenHistoryEntry> = read_json(file)?;
    info!("Loaded {} past races from {:?}", history.len(), file);
    let summary = analyze_historical_burden(&history);

    if json {
        return print_json(&summary);
    }

    println!("{}", "부담중량 이력 (Burden History):".yellow().bold());
    println!("  Races:            {}", summary.races);
    println!("  Average burden:   {:.1}kg", summary.avg_burden);
    println!("  Average ratio:    {:.2}%", summary.avg_ratio);
    println!("  Best-run burden:  {:.1}kg", summary.best_performance_burden);
    println!(
        "  Winning ratios:   {:.2}% - {:.2}%",
        summary.winning_ratio_range.min, summary.winning_ratio_range.max
    );
    println!("  Correlation:      {:+.3}", summary.correlation);
    if summary.correlation > 0.5 {
        println!("  {}", "Heavier burdens track worse finishes".red());
    }

    Ok(())
}

fn run_combo(
    config: &AnalyzerConfig,
    stats: &ComboStats,
    jockey_avg: f64,
    trainer_avg: f64,
    extras: &ComboExtras,
    meet: Option<&str>,
    json: bool,
) -> Result<()> {
    let analyzer = ComboAnalyzer::new(config.combo.clone());
    let analysis = analyzer.analyze(stats, jockey_avg, trainer_avg, extras);

    if json {
        return print_json(&to_jockey_trainer_combo(&analysis, meet, None));
    }

    println!("{}", "기수-조교사 조합 (Jockey-Trainer Combo):".yellow().bold());
    println!("  Jockey / Trainer: {} / {}", analysis.jockey_id, analysis.trainer_id);
    println!("  Starts / Wins:    {} / {}", analysis.starts, analysis.wins);
    println!("  Win rate:         {:.1}%", analysis.win_rate);
    println!("  Place rate:       {:.1}%", analysis.place_rate);
    println!("  Uplift:           {:+.1}%", analysis.uplift_percent);
    println!("  Synergy:          {:.1} ({})", analysis.synergy_score, grade_label(analysis.synergy_grade));
    println!("  Reliability:      {}", reliability_label(analysis.reliability));
    if analyzer.is_positive_synergy(analysis.win_rate, jockey_avg, trainer_avg) {
        println!("  {}", "Positive synergy".green());
    }

    Ok(())
}

fn run_combos(
    config: &AnalyzerConfig,
    file: &Path,
    filter: &ComboFilter,
    sort_by: ComboSortKey,
    order: SortOrder,
    top: usize,
    json: bool,
) -> Result<()> {
    let records: Vec<ComboRecord> = read_json(file)?;
    info!("Loaded {} combos from {:?}", records.len(), file);

    let analyzer = ComboAnalyzer::new(config.combo.clone());
    let analyses: Vec<ComboAnalysis> = records
        .iter()
        .map(|r| analyzer.analyze(&r.stats, r.jockey_avg_win_rate, r.trainer_avg_win_rate, &r.extras))
        .collect();

    let filtered = filter_synergistic_combos(&analyses, filter);
    let mut ranked = rank_combos(&filtered, sort_by, order);
    ranked.truncate(top);
    let summary = summarize_combo_stats(&analyses);

    if json {
        return print_json(&serde_json::json!({ "combos": ranked, "summary": summary }));
    }

    println!(
        "{}",
        format!("조합 순위 (Combos: {} of {}):", ranked.len(), analyses.len())
            .yellow()
            .bold()
    );
    println!(
        "{:<16} {:<14} {:>6} {:>8} {:>8} {:>8} {:>6}",
        "이름", "ID", "출전", "승률", "복승률", "시너지", "등급"
    );
    println!("{}", "-".repeat(72));

    for combo in &ranked {
        println!(
            "{:<16} {:<14} {:>6} {:>7.1}% {:>7.1}% {:>8.1} {:>6}",
            truncate_name(&combo.name, 16),
            format!("{}-{}", combo.jockey_id, combo.trainer_id),
            combo.starts,
            combo.win_rate,
            combo.place_rate,
            combo.synergy_score,
            grade_label(combo.synergy_grade)
        );
    }

    println!();
    println!("{}", "요약 (Summary):".yellow().bold());
    println!("  Total combos:   {}", summary.total_combos);
    println!("  Avg win rate:   {:.1}%", summary.avg_win_rate);
    let distribution: Vec<String> = SynergyGrade::ALL
        .iter()
        .map(|g| format!("{}={}", g, summary.grade_distribution.get(g).copied().unwrap_or(0)))
        .collect();
    println!("  Grades:         {}", distribution.join(" "));

    Ok(())
}

fn run_signals(db: &SireDatabase, config: &AnalyzerConfig, file: &Path, json: bool) -> Result<()> {
    let runners: Vec<RunnerInput> = read_json(file)?;
    info!("Loaded {} runners from {:?}", runners.len(), file);

    let adapter = SignalAdapter::new(db, config);
    let signals: Vec<_> = runners.iter().map(|r| adapter.runner_signals(r)).collect();

    if json {
        return print_json(&signals);
    }

    println!("{}", "예측 신호 (Predictor Signals):".yellow().bold());
    println!(
        "{:<16} {:>6} {:>6} {:>8} {:>8} {:>8}",
        "마명", "거리", "더트", "혈통적합", "부담", "조합"
    );
    println!("{}", "-".repeat(60));

    for s in &signals {
        let fit = s
            .bloodline_fit
            .map(|f| format!("{:.1}", f))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:>6} {:>6} {:>8} {:>8.1} {:>8.1}",
            truncate_name(&s.horse_name, 16),
            s.bloodline.distance_aptitude,
            s.bloodline.dirt_aptitude,
            fit,
            s.burden_score,
            s.combo_score
        );
    }

    Ok(())
}

fn list_sires(db: &SireDatabase, json: bool) -> Result<()> {
    if json {
        let profiles: std::collections::BTreeMap<_, _> = db.iter().collect();
        return print_json(&profiles);
    }

    println!(
        "{}",
        format!("종마 목록 (Sires: {}, version {}):", db.len(), db.version())
            .yellow()
            .bold()
    );
    println!("{:<16} {:>6} {:>6} {:>8}", "종마", "거리", "더트", "최적거리");
    println!("{}", "-".repeat(40));

    for (name, profile) in db.iter() {
        println!(
            "{:<16} {:>6} {:>6} {:>7}m",
            truncate_name(name, 16),
            profile.distance_aptitude,
            profile.dirt_aptitude,
            profile.optimal_distance
        );
    }

    Ok(())
}

//! 手帐 CLI 客户端（测试版）
//!
//! 非交互式 CLI，用于测试和展示手帐核心功能：
//! 写入演示数据、查看游园列表与统计、导出 / 导入快照。

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use parklog_core_rust::journal::action::models::{ActionDetails, ActionDraft};
use parklog_core_rust::journal::client::{JournalClient, JournalClientConfig};
use parklog_core_rust::journal::listener::JournalListener;
use parklog_core_rust::journal::migration::listener::MigrationListener;
use parklog_core_rust::journal::migration::models::ImportState;
use parklog_core_rust::journal::types::{Area, MealType, Park, PassType, Weather};
use parklog_core_rust::journal::visit::models::VisitDraft;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// 手帐 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "parklog-cli")]
#[command(about = "手帐 CLI 客户端 - 用于测试和展示记录/统计/迁移功能", long_about = None)]
struct Args {
    /// 本地数据库 URL（默认: sqlite://parklog.db?mode=rwc）
    #[arg(long, default_value = "sqlite://parklog.db?mode=rwc")]
    db: String,

    /// 日志级别（默认: info,parklog_core_rust=debug）
    #[arg(long, default_value = "info,parklog_core_rust=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 写入一批演示数据（游园、伙伴、时间线活动）
    Seed,
    /// 列出全部游园记录，日期降序
    Visits,
    /// 展示仪表盘统计（游园 + 活动两个维度）
    Stats,
    /// 导出 / 导入前的本地存量预览
    Preview,
    /// 导出全量快照到 JSON 文件
    Export {
        /// 输出文件路径
        #[arg(long, default_value = "parklog-snapshot.json")]
        out: PathBuf,
    },
    /// 从 JSON 快照文件整体导入（清库重写）
    Import {
        /// 快照文件路径
        #[arg(long)]
        file: PathBuf,
    },
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 创建日志文件（追加模式）
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    // 输出到 stdout（控制台），保留 ANSI 颜色代码用于终端显示
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 输出到文件，禁用 ANSI 颜色代码（文件不需要颜色）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
}

/// 设置监听器（输出所有接收到的回调）
fn setup_listeners(client: &mut JournalClient) {
    // 记录本监听器
    struct CliJournalListener;
    #[async_trait::async_trait]
    impl JournalListener for CliJournalListener {
        async fn on_visit_list_changed(&self, visit_list: String) {
            info!("[CLI/Journal] 📋 游园列表变更: {}", visit_list);
        }

        async fn on_companion_list_changed(&self, companion_list: String) {
            info!("[CLI/Journal] 👥 伙伴列表变更: {}", companion_list);
        }

        async fn on_timeline_changed(&self, visit_id: String, timeline: String) {
            info!("[CLI/Journal] 🕐 游园 {} 时间线变更: {}", visit_id, timeline);
        }

        async fn on_total_visit_count_changed(&self, total_count: i64) {
            info!("[CLI/Journal] 🎡 游园总次数: {}", total_count);
        }
    }
    client.set_journal_listener(Arc::new(CliJournalListener));

    // 迁移监听器
    struct CliMigrationListener;
    #[async_trait::async_trait]
    impl MigrationListener for CliMigrationListener {
        async fn on_import_state_changed(&self, state: ImportState) {
            info!("[CLI/Migration] 🔄 导入状态: {}", state);
        }

        async fn on_import_progress(&self, progress: i32) {
            info!("[CLI/Migration] 📊 导入进度: {}%", progress);
        }

        async fn on_import_finish(&self, report: String) {
            info!("[CLI/Migration] ✅ 导入完成: {}", report);
        }

        async fn on_import_failed(&self, errors: String) {
            error!("[CLI/Migration] ❌ 导入失败: {}", errors);
        }

        async fn on_export_finish(&self, metadata: String) {
            info!("[CLI/Migration] ✅ 导出完成: {}", metadata);
        }
    }
    client.set_migration_listener(Arc::new(CliMigrationListener));
}

/// 写入一批演示数据：两位伙伴、三次游园、若干时间线活动
async fn run_seed(client: &JournalClient) -> Result<()> {
    info!("[CLI] 🌱 写入演示数据...");

    let mei = client.add_companion("小美").await?;
    let lan = client.add_companion("小兰").await?;

    let mut draft = VisitDraft::new(
        NaiveDate::from_ymd_opt(2024, 1, 15).context("非法日期")?,
        Park::Land,
    );
    draft.companion_ids = vec![mei.id.clone(), lan.id.clone()];
    draft.pass_type = Some(PassType::OneDay);
    draft.weather = Some(Weather::Sunny);
    draft.start_time = Some("09:00:00".parse()?);
    draft.end_time = Some("21:00:00".parse()?);
    let v1 = client.record_visit(draft).await?;

    let mut draft = VisitDraft::new(
        NaiveDate::from_ymd_opt(2024, 1, 20).context("非法日期")?,
        Park::Land,
    );
    draft.companion_ids = vec![mei.id.clone()];
    draft.weather = Some(Weather::Cloudy);
    let v2 = client.record_visit(draft).await?;

    let mut draft = VisitDraft::new(
        NaiveDate::from_ymd_opt(2024, 2, 1).context("非法日期")?,
        Park::Sea,
    );
    draft.companion_ids = vec![lan.id.clone()];
    draft.pass_type = Some(PassType::Annual);
    let v3 = client.record_visit(draft).await?;

    let mut ride = ActionDraft::new(
        &v1.id,
        Area::Tomorrowland,
        "スペース・マウンテン",
        "2024-01-15T10:00:00".parse()?,
        ActionDetails::Attraction {
            used_priority_pass: true,
        },
    );
    ride.wait_minutes = Some(45);
    ride.rating = Some(5);
    client.add_action(ride).await?;

    let mut meal = ActionDraft::new(
        &v1.id,
        Area::Westernland,
        "れすとらん北齋",
        "2024-01-15T12:30:00".parse()?,
        ActionDetails::Restaurant {
            meal_type: Some(MealType::Lunch),
            amount: Some(2400.0),
        },
    );
    meal.duration_minutes = Some(50);
    client.add_action(meal).await?;

    let mut ride = ActionDraft::new(
        &v2.id,
        Area::Tomorrowland,
        "スペース・マウンテン",
        "2024-01-20T11:00:00".parse()?,
        ActionDetails::Attraction {
            used_priority_pass: false,
        },
    );
    ride.wait_minutes = Some(70);
    client.add_action(ride).await?;

    let mut ride = ActionDraft::new(
        &v3.id,
        Area::MysteriousIsland,
        "センター・オブ・ジ・アース",
        "2024-02-01T10:30:00".parse()?,
        ActionDetails::Attraction {
            used_priority_pass: false,
        },
    );
    ride.wait_minutes = Some(90);
    ride.rating = Some(5);
    client.add_action(ride).await?;

    let show = ActionDraft::new(
        &v3.id,
        Area::MermaidLagoon,
        "マーメイドラグーンシアター",
        "2024-02-01T14:00:00".parse()?,
        ActionDetails::Show {
            performers: vec!["アリエル".to_string()],
        },
    );
    client.add_action(show).await?;

    info!("[CLI] ✅ 演示数据写入完成：3 次游园 / 2 位伙伴 / 5 条活动");
    Ok(())
}

async fn run_visits(client: &JournalClient) -> Result<()> {
    let visits = client.get_all_visits().await?;
    info!("[CLI] 📋 游园记录（共 {} 次）:", visits.len());
    for v in &visits {
        info!(
            "[CLI]   - {} | {} | {} | 伙伴 {} 位 | 活动 {} 条",
            v.id,
            v.date,
            v.park.display_name(),
            v.companion_ids.len(),
            v.action_count.unwrap_or(0)
        );
    }
    Ok(())
}

async fn run_stats(client: &JournalClient) -> Result<()> {
    let dashboard = client.get_dashboard().await?;

    info!("[CLI] 🎡 游园统计: 共 {} 次", dashboard.visits.total_visits);
    for (park, count) in &dashboard.visits.count_by_park {
        info!("[CLI]   - {}: {} 次", park.display_name(), count);
    }
    if let Some(minutes) = dashboard.visits.average_duration_minutes {
        info!("[CLI]   - 平均游园时长: {:.0} 分钟", minutes);
    }
    for bucket in &dashboard.visits.visits_by_month {
        info!("[CLI]   - {}: {} 次", bucket.month, bucket.count);
    }
    for rank in &dashboard.visits.companion_ranking {
        info!("[CLI]   - 同行 {}: {} 次", rank.name, rank.count);
    }

    info!("[CLI] 🕐 活动统计: 共 {} 条", dashboard.actions.total_actions);
    for (category, count) in &dashboard.actions.count_by_category {
        info!("[CLI]   - {}: {} 条", category.display_name(), count);
    }
    for rank in &dashboard.actions.top_attractions {
        match rank.average_wait_minutes {
            Some(wait) => info!(
                "[CLI]   - 🎢 {} × {}（平均等待 {:.0} 分钟）",
                rank.location, rank.count, wait
            ),
            None => info!("[CLI]   - 🎢 {} × {}（无等待记录）", rank.location, rank.count),
        }
    }
    for stat in &dashboard.actions.area_distribution {
        info!(
            "[CLI]   - 📍 {}: {} 条（{}%）",
            stat.area.display_name(),
            stat.count,
            stat.percentage
        );
    }
    info!(
        "[CLI]   - 场均活动数: {:.1} | 照片: {} 张",
        dashboard.actions.average_actions_per_visit, dashboard.actions.total_photos
    );
    Ok(())
}

async fn run_preview(client: &JournalClient) -> Result<()> {
    let preview = client.get_store_preview().await?;
    info!(
        "[CLI] 🔍 本地存量: {} 次游园 / {} 位伙伴 / {} 条活动 / {} 张照片",
        preview.total_visits,
        preview.total_companions,
        preview.total_actions,
        preview.total_photos
    );
    Ok(())
}

async fn run_export(client: &JournalClient, out: &PathBuf) -> Result<()> {
    let document = client.export_snapshot().await?;
    let json = serde_json::to_string_pretty(&document).context("序列化快照文档失败")?;
    tokio::fs::write(out, json)
        .await
        .with_context(|| format!("写入快照文件失败: {}", out.display()))?;
    info!("[CLI] 💾 快照已写入: {}", out.display());
    Ok(())
}

async fn run_import(client: &JournalClient, file: &PathBuf) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("读取快照文件失败: {}", file.display()))?;
    let document: serde_json::Value =
        serde_json::from_str(&raw).context("快照文件不是合法的 JSON")?;

    match client.import_snapshot(document).await {
        Ok(report) => {
            info!(
                "[CLI] ✅ 导入完成: {} 次游园 / {} 位伙伴 / {} 条活动（丢弃照片 {} 张）",
                report.imported_visits,
                report.imported_companions,
                report.imported_actions,
                report.dropped_photos
            );
            Ok(())
        }
        Err(e) => {
            error!("[CLI] ❌ 导入失败: {}", e);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level);

    info!("[CLI] 🚀 手帐 CLI 客户端（测试模式）");
    info!("[CLI] 🗄️  数据库: {}", args.db);

    // 创建客户端并打开本地数据库
    let config = JournalClientConfig {
        db_url: args.db.clone(),
        ..JournalClientConfig::new()
    };
    let mut client = JournalClient::new(config);
    setup_listeners(&mut client);
    client
        .connect()
        .await
        .map_err(|e| anyhow::anyhow!("打开本地数据库失败: {}", e))?;

    match &args.command {
        Command::Seed => run_seed(&client).await?,
        Command::Visits => run_visits(&client).await?,
        Command::Stats => run_stats(&client).await?,
        Command::Preview => run_preview(&client).await?,
        Command::Export { out } => run_export(&client, out).await?,
        Command::Import { file } => run_import(&client, file).await?,
    }

    info!("[CLI] 👋 完成");
    Ok(())
}

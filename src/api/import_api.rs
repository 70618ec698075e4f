// ==========================================
// Точка входа импорта
// ==========================================
// Поток: чтение -> классификация -> маршрутизация ->
// разбор полей / восстановление нарядов ->
// предпросмотр | (копия -> транзакция -> запись) -> отчёт
//
// Конвейер однопоточный и синхронный; разбор завершается
// целиком до первой записи, поэтому частично прочитанный файл
// никогда не фиксируется частично.
// ==========================================

use crate::api::backup;
use crate::api::report::{self, bullet_list, paragraph};
use crate::config::ImportConfig;
use crate::domain::entities::{Contract, JobType, OrderGroup, Product, Worker};
use crate::domain::types::{DetectedTable, ImportPreset, TableKind, UpsertStats};
use crate::i18n;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_scanner::OrderScanner;
use crate::importer::raw_table::RawTable;
use crate::importer::readers::{read_any_tabular, ReadOutcome};
use crate::importer::{field_parsers, resolver};
use crate::repository::order_repo::commit_order_groups;
use crate::repository::{catalog_repo, ImportStore};
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Колбэк прогресса: (шаг, всего, пометка)
///
/// Вызывается в режиме «выстрелил и забыл»; паника внутри колбэка
/// гасится и импорт не прерывает.
pub type ProgressFn = dyn Fn(usize, usize, &str);

/// Параметры одного вызова импорта
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    pub dry_run: bool,
    pub preset: ImportPreset,
    pub backup_before: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            preset: ImportPreset::Auto,
            backup_before: true,
        }
    }
}

/// Итог предпросмотра (без записи в базу)
#[derive(Debug)]
pub struct DryRunReport {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
    pub report_path: PathBuf,
}

/// Итог реального импорта
#[derive(Debug)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub report_path: Option<PathBuf>,
}

/// Итог вызова import_data
#[derive(Debug)]
pub enum ImportOutput {
    DryRun(DryRunReport),
    Committed(ImportSummary),
}

/// Разобранное содержимое файла до стадии записи
#[derive(Debug, Default)]
struct ParsedBatch {
    workers: Vec<Worker>,
    job_types: Vec<JobType>,
    products: Vec<Product>,
    contracts: Vec<Contract>,
    order_groups: Vec<OrderGroup>,
    skipped: usize,
}

impl ParsedBatch {
    fn entity_count(&self) -> usize {
        self.workers.len() + self.job_types.len() + self.products.len() + self.contracts.len()
    }
}

/// Импорт одного файла
///
/// В режиме предпросмотра база не открывается вовсе; в реальном
/// режиме все записи идут в одной транзакции, а перед ней
/// опционально снимается резервная копия базы.
#[instrument(skip(config, progress), fields(path = %path.display(), dry_run = options.dry_run))]
pub fn import_data(
    config: &ImportConfig,
    path: &Path,
    options: &ImportOptions,
    progress: Option<&ProgressFn>,
) -> ImportResult<ImportOutput> {
    i18n::set_locale(&config.locale);
    let mut warnings: Vec<String> = Vec::new();

    // === Шаг 1: чтение файла ===
    fire_progress(progress, 0, 3, &i18n::t("progress.reading"));
    let tables = match read_any_tabular(path)? {
        ReadOutcome::Tables(tables) => tables,
        ReadOutcome::Unsupported { reason } => {
            warnings.push(reason);
            Vec::new()
        }
    };
    info!(tables = tables.len(), "файл прочитан");

    // === Шаг 2: классификация и маршрутизация ===
    fire_progress(progress, 1, 3, &i18n::t("progress.detecting"));
    let detections = resolver::detect_all(&tables);
    let routed = resolver::route(&tables);
    if routed.is_empty() {
        warnings.push(i18n::t("report.nothing_recognized"));
    }
    let plan = resolver::apply_preset(routed, options.preset);
    info!(plan = plan.len(), "план маршрутизации построен");

    // === Шаг 3: разбор таблиц ===
    let total_steps = plan.len() + 3;
    let fallback_year = config
        .reference_year
        .unwrap_or_else(|| Local::now().year());

    let mut batch = ParsedBatch::default();
    for (step, (kind, index)) in plan.iter().enumerate() {
        fire_progress(
            progress,
            step + 2,
            total_steps,
            &i18n::t("progress.parsing"),
        );
        parse_table(&tables[*index], *kind, fallback_year, &mut batch)?;
    }
    info!(
        entities = batch.entity_count(),
        orders = batch.order_groups.len(),
        skipped = batch.skipped,
        "разбор завершён"
    );

    // === Шаг 4: предпросмотр или запись ===
    if options.dry_run {
        return dry_run_output(config, path, &detections, &batch, warnings, progress, total_steps);
    }
    commit_output(config, path, &detections, batch, warnings, options, progress, total_steps)
}

/// Разбор одной таблицы в накопитель
fn parse_table(
    table: &RawTable,
    kind: TableKind,
    fallback_year: i32,
    batch: &mut ParsedBatch,
) -> ImportResult<()> {
    match kind {
        TableKind::Workers => {
            let parsed = field_parsers::parse_workers(table)?;
            batch.skipped += parsed.skipped;
            batch.workers.extend(parsed.entities);
        }
        TableKind::JobTypes => {
            let parsed = field_parsers::parse_job_types(table)?;
            batch.skipped += parsed.skipped;
            batch.job_types.extend(parsed.entities);
        }
        TableKind::Products => {
            let parsed = field_parsers::parse_products(table)?;
            batch.skipped += parsed.skipped;
            batch.products.extend(parsed.entities);
        }
        TableKind::Contracts => {
            let parsed = field_parsers::parse_contracts(table)?;
            batch.skipped += parsed.skipped;
            batch.contracts.extend(parsed.entities);
        }
        TableKind::Orders => {
            batch
                .order_groups
                .extend(OrderScanner::scan_table(table, fallback_year));
        }
        TableKind::Unknown => {}
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn dry_run_output(
    config: &ImportConfig,
    path: &Path,
    detections: &[DetectedTable],
    batch: &ParsedBatch,
    warnings: Vec<String>,
    progress: Option<&ProgressFn>,
    total_steps: usize,
) -> ImportResult<ImportOutput> {
    fire_progress(progress, total_steps - 1, total_steps, &i18n::t("progress.report"));

    let added = batch.entity_count() + batch.order_groups.len();
    let fragments = report_fragments(path, detections, batch, &warnings, added, 0);
    let report_path = report::write_html_report(
        &config.report_dir,
        "import_preview",
        &i18n::t("report.title_dry_run"),
        &fragments,
    )?;

    info!(report = %report_path.display(), "предпросмотр завершён");
    Ok(ImportOutput::DryRun(DryRunReport {
        added,
        updated: 0,
        skipped: batch.skipped,
        warnings,
        report_path,
    }))
}

#[allow(clippy::too_many_arguments)]
fn commit_output(
    config: &ImportConfig,
    path: &Path,
    detections: &[DetectedTable],
    batch: ParsedBatch,
    warnings: Vec<String>,
    options: &ImportOptions,
    progress: Option<&ProgressFn>,
    total_steps: usize,
) -> ImportResult<ImportOutput> {
    fire_progress(progress, total_steps - 1, total_steps, &i18n::t("progress.committing"));

    // копия строго до открытия транзакции: её сбой прерывает
    // импорт до любой мутации
    if options.backup_before && config.store_path.exists() {
        backup::snapshot(&config.store_path, &config.backup_dir)?;
    }

    let store_path = config.store_path.to_string_lossy().to_string();
    let store = ImportStore::open(&store_path)?;

    let mut totals = UpsertStats::default();
    let mut orders_added = 0usize;
    store.with_transaction(|conn| {
        totals.merge(catalog_repo::upsert_workers(conn, &batch.workers)?);
        totals.merge(catalog_repo::upsert_job_types(conn, &batch.job_types)?);
        totals.merge(catalog_repo::upsert_products(conn, &batch.products)?);
        totals.merge(catalog_repo::upsert_contracts(conn, &batch.contracts)?);

        let order_stats = commit_order_groups(conn, &batch.order_groups)?;
        totals.merge(order_stats.contracts);
        totals.merge(order_stats.products);
        totals.merge(order_stats.job_types);
        totals.merge(order_stats.workers);
        orders_added += order_stats.orders_added;
        Ok(())
    })?;

    let added = totals.added + orders_added;
    info!(
        added = added,
        updated = totals.updated,
        skipped = batch.skipped,
        "импорт зафиксирован"
    );

    let fragments =
        report_fragments(path, detections, &batch, &warnings, added, totals.updated);
    let report_path = report::write_html_report(
        &config.report_dir,
        "import_result",
        &i18n::t("report.title_commit"),
        &fragments,
    )
    .map_err(|e| {
        warn!(error = %e, "отчёт о фиксации не записан");
        e
    })
    .ok();

    Ok(ImportOutput::Committed(ImportSummary {
        added,
        updated: totals.updated,
        skipped: batch.skipped,
        errors: 0,
        report_path,
    }))
}

/// Тело HTML-отчёта
fn report_fragments(
    path: &Path,
    detections: &[DetectedTable],
    batch: &ParsedBatch,
    warnings: &[String],
    added: usize,
    updated: usize,
) -> Vec<String> {
    let mut fragments = Vec::new();

    fragments.push(paragraph(&i18n::t_with_args(
        "report.source_file",
        &[("path", &path.display().to_string())],
    )));

    for warning in warnings {
        fragments.push(paragraph(warning));
    }

    if !detections.is_empty() {
        fragments.push(paragraph(&i18n::t("report.detected_header")));
        let lines: Vec<String> = detections
            .iter()
            .map(|d| {
                i18n::t_with_args(
                    "report.detected_line",
                    &[
                        ("index", &(d.source_index + 1).to_string()),
                        ("kind", &d.kind.to_string()),
                        ("hints", &d.hints.join("; ")),
                    ],
                )
            })
            .collect();
        fragments.push(bullet_list(&lines));
    }

    let mut kind_lines = Vec::new();
    for (kind, count) in [
        (TableKind::Workers, batch.workers.len()),
        (TableKind::JobTypes, batch.job_types.len()),
        (TableKind::Products, batch.products.len()),
        (TableKind::Contracts, batch.contracts.len()),
    ] {
        if count > 0 {
            kind_lines.push(i18n::t_with_args(
                "report.kind_line",
                &[("kind", &kind.to_string()), ("count", &count.to_string())],
            ));
        }
    }
    if !batch.order_groups.is_empty() {
        kind_lines.push(i18n::t_with_args(
            "report.orders_line",
            &[("count", &batch.order_groups.len().to_string())],
        ));
    }
    if !kind_lines.is_empty() {
        fragments.push(bullet_list(&kind_lines));
    }

    fragments.push(paragraph(&i18n::t_with_args(
        "report.totals_line",
        &[
            ("added", &added.to_string()),
            ("updated", &updated.to_string()),
            ("skipped", &batch.skipped.to_string()),
        ],
    )));

    fragments
}

/// Выстрелить колбэком прогресса, стерпев его панику
fn fire_progress(progress: Option<&ProgressFn>, step: usize, total: usize, note: &str) {
    if let Some(callback) = progress {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            callback(step, total, note)
        }));
        if outcome.is_err() {
            warn!("колбэк прогресса завершился паникой, импорт продолжен");
        }
    }
}

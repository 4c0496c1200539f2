use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uic301lib::{
    config::Config,
    error::{Result, Uic301Error},
    formats::{csv::AmountsCsv, xml::Xml},
    index::IndexStore,
    model::Documents,
    traits::WriteFormat,
};

#[derive(Parser, Debug)]
#[command(name = "uic301", version, about = "Проверка и индексация файлов расчётов UIC 301")]
struct Cli {
    /// TOML-конфигурация (без неё действуют значения по умолчанию)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Разобрать, проверить и сверить плоский файл
    Check(CheckArgs),
    /// Построить или загрузить индекс смещений сериализованного дерева
    Index {
        xml: PathBuf,
        /// Пересканировать, даже если индекс пригоден
        #[arg(long)]
        force: bool,
    },
    /// Прочитать один элемент сериализованного дерева через индекс
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    input: PathBuf,

    /// Куда записать сериализованное дерево
    #[arg(long)]
    xml: Option<PathBuf>,

    /// Куда записать отчёт сверки (CSV)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Завершиться с ошибкой, если записана хотя бы одна ошибка
    #[arg(long)]
    fail_on_errors: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    xml: PathBuf,

    /// Номер документа (с нуля)
    #[arg(long)]
    document: usize,

    #[arg(long, conflicts_with_all = ["detail", "total"])]
    header: bool,

    /// Номер детальной строки в документе (с нуля)
    #[arg(long, conflicts_with = "total")]
    detail: Option<usize>,

    /// Номер итоговой строки в документе (с нуля)
    #[arg(long)]
    total: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Check(args) => check(&config, args),
        Command::Index { xml, force } => index(&config, xml, force),
        Command::Show(args) => show(&config, args),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Uic301Error::File {
        op: "create",
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn check(config: &Config, args: CheckArgs) -> Result<()> {
    let docs = uic301lib::Parser::new(&config.parser).parse_file(&args.input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    summarize(&mut out, &docs)?;

    if let Some(path) = &args.xml {
        let mut w = create(path)?;
        Xml::write(&mut w, &docs)?;
        w.flush()?;
    }
    if let Some(path) = &args.report {
        let mut w = create(path)?;
        AmountsCsv::write(&mut w, &docs)?;
        w.flush()?;
    }

    if args.fail_on_errors && docs.error_count() > 0 {
        return Err(Uic301Error::Parse(format!(
            "{}: {} error(s)",
            args.input.display(),
            docs.error_count()
        )));
    }
    Ok(())
}

fn summarize(out: &mut impl Write, docs: &Documents) -> Result<()> {
    for (idx, doc) in docs.iter().enumerate() {
        let header = doc.header();
        writeln!(
            out,
            "#{idx} {} line {}: RU {} -> {}, period {}, {} detail(s), {} total(s), {} error(s){}{}",
            doc.document_type(),
            header.line(),
            header.ru_compiling(),
            header.ru_receiving(),
            header.statement_period(),
            doc.details().len(),
            doc.totals().len(),
            doc.error_count(),
            if doc.ignore_block() { ", ignored" } else { "" },
            if doc.is_valid() { "" } else { ", INVALID" },
        )?;
        for violation in doc.violations() {
            writeln!(out, "    {}: {}", violation.validator, violation.message)?;
        }
    }
    writeln!(out, "{} document(s), {} error(s)", docs.len(), docs.error_count())?;
    Ok(())
}

fn index(config: &Config, xml: PathBuf, force: bool) -> Result<()> {
    let store = IndexStore::open_with(&xml, force || config.index.force_rebuild)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "{} ({})",
        IndexStore::index_path(&xml).display(),
        if store.was_rebuilt() { "rebuilt" } else { "loaded" }
    )?;
    for (kind, count) in store.tree().kind_counts() {
        writeln!(out, "{:>12} {count}", kind.name())?;
    }
    Ok(())
}

fn show(config: &Config, args: ShowArgs) -> Result<()> {
    let store = IndexStore::open_with(&args.xml, config.index.force_rebuild)?;
    let doc = store.document(args.document)?;
    let tag = match (args.header, args.detail, args.total) {
        (true, _, _) => doc.header(),
        (_, Some(m), _) => doc.detail(m),
        (_, _, Some(m)) => doc.total(m),
        _ => Some(doc),
    }
    .ok_or_else(|| Uic301Error::Index(format!("no such element in document #{}", args.document)))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&store.read_element(tag)?)?;
    writeln!(out)?;

    match (args.header, args.detail, args.total) {
        (true, _, _) => {
            let h = store.load_header(args.document)?;
            writeln!(out, "{h:#?}")?;
        }
        (_, Some(m), _) => {
            let d = store.load_detail(args.document, m)?;
            writeln!(out, "{d:#?}")?;
        }
        (_, _, Some(m)) => {
            let t = store.load_total(args.document, m)?;
            writeln!(out, "{t:#?}")?;
        }
        _ => {
            let attrs = store.document_attributes(args.document)?;
            let d = store.load_document_with(args.document, &config.parser.cross_checks())?;
            writeln!(out, "{attrs:?}")?;
            for v in d.violations() {
                writeln!(out, "{}: {}", v.validator, v.message)?;
            }
        }
    }
    Ok(())
}

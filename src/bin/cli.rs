use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use trivia_api::configuration::DatabaseSettings;
use trivia_api::db::queries::categories::{
    create_category, get_all_categories, import_categories, remove_categories_except,
};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{establish_connection, run_migrations, Category, Question};
use trivia_api::telemetry::init_tracing;

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database url, e.g. sqlite:trivia.db
    database_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace categories and questions with the csv files in a directory
    Import { path: PathBuf },
    /// Write categories and questions as csv files into a directory
    Export { path: PathBuf },
    /// Add a single category
    AddCategory { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = DatabaseSettings {
        url: cli.database_url.into(),
        max_connections: 1,
    };
    let pool = establish_connection(&settings)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await.context("Migrations failed")?;

    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import")?,
        Commands::AddCategory { name } => {
            let id = create_category(&pool, &name).await?;
            tracing::info!(id, "Category {name} created");
        }
    }
    Ok(())
}

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let file = File::open(&path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Bad record in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        path.display()
    );
    write_to(path.join(CATEGORIES_FILE), categories)?;
    write_to(path.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

// categories go in first so imported questions can reference them, and stale
// categories go last once no question points at them
async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(path.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(path.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        path.display()
    );
    import_categories(pool, &categories).await?;
    import_questions(pool, &questions).await?;
    remove_categories_except(pool, &categories).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool() -> SqlitePool {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string().into(),
            max_connections: 1,
        };
        let pool = establish_connection(&settings).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn export_then_import_into_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let source = pool().await;
        let science = create_category(&source, "Science").await.unwrap();
        trivia_api::db::queries::questions::create_question(
            &source,
            &trivia_api::db::NewQuestion {
                question: "What is H2O?".to_owned(),
                answer: "Water".to_owned(),
                category: science,
                difficulty: 1,
            },
        )
        .await
        .unwrap();

        let target_dir = dir.path().join("dump");
        export_data(&source, &target_dir).await.unwrap();
        let header = std::fs::read_to_string(target_dir.join(CATEGORIES_FILE)).unwrap();
        assert!(header.starts_with("id,type"));

        let target = pool().await;
        create_category(&target, "Stale").await.unwrap();
        create_category(&target, "Also stale").await.unwrap();
        import_data(&target, &target_dir).await.unwrap();

        assert_eq!(
            get_all_categories(&target).await.unwrap(),
            get_all_categories(&source).await.unwrap()
        );
        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
    }
}

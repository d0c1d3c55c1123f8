use anyhow::Result;
use std::io::Write;
use clap::{Args, Parser, Subcommand};
use common::agent::{QueryCorrector, QueryResult, DEFAULT_MAX_ATTEMPTS};
use common::config::CompletionSettings;
use common::db::{describe_schema, Database, DatabaseGateway};
use common::llm::{CompletionGateway, GatewayError, OpenAiClient};
use common::Nl2SqlError;
use common::report::{render_json, render_text};
use common::tracing::init_tracing;

/// questions answered when none are given on the command line
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "List users who spent more than 1000 in Bangalore",
    "How many products were sold in each city?",
    "Which product has the highest total purchased quantity?",
];

#[derive(Parser)]
#[command(name = "nl2sql")]
#[command(about = "answer natural language questions with llm-generated sql", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and run SQL for each question against the sample database
    Ask(AskArgs),

    /// Print the sample database schema as it is shown to the model
    Schema,
}

#[derive(Args, Default)]
struct AskArgs {
    /// Question to answer (repeatable); defaults to the built-in list
    #[arg(short, long = "question")]
    questions: Vec<String>,

    /// Maximum generate-and-execute attempts per question
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS as u32, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: u32,

    /// Completion model name
    #[arg(long, env = "NL2SQL_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Print one JSON document per question instead of text
    #[arg(long, default_value = "false")]
    json: bool,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let _guard = init_tracing("nl2sql")?;

        match self.command {
            Some(Commands::Ask(args)) => ask(args).await,
            Some(Commands::Schema) => print_schema(),
            None => {
                ask(AskArgs {
                    max_attempts: DEFAULT_MAX_ATTEMPTS as u32,
                    ..AskArgs::default()
                })
                .await
            }
        }
    }
}

fn print_schema() -> Result<()> {
    let db = Database::with_sample_data()?;
    let schema = describe_schema(&db)?;
    println!("{}", schema);
    db.close()?;
    Ok(())
}

async fn ask(args: AskArgs) -> Result<()> {
    // credentials first: a missing key must fail before any work is done
    let settings = CompletionSettings::resolve(args.model, args.base_url)?;
    tracing::info!(model = %settings.model.model, "using completion model");

    let questions: Vec<String> = if args.questions.is_empty() {
        DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        args.questions
    };

    let db = Database::with_sample_data()?;
    let corrector = QueryCorrector::with_max_attempts(
        OpenAiClient::new(settings),
        args.max_attempts as usize,
    );

    let mut stdout = std::io::stdout();
    let outcome = run_batch(&corrector, &db, &questions, args.json, &mut stdout).await;

    db.close()?;
    outcome.map(|_| ())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BatchSummary {
    answered: usize,
    exhausted: usize,
    interrupted: bool,
}

/// questions run strictly in order; exhaustion moves on to the next one,
/// a completion failure or ctrl+c stops the batch
async fn run_batch<C, D, W>(
    corrector: &QueryCorrector<C>,
    db: &D,
    questions: &[String],
    json: bool,
    out: &mut W,
) -> Result<BatchSummary>
where
    C: CompletionGateway,
    D: DatabaseGateway + ?Sized,
    W: Write,
{
    let mut summary = BatchSummary::default();

    for question in questions {
        writeln!(out, "\nProcessing question: {}", question)?;

        let answered = tokio::select! {
            answered = corrector.answer(db, question) => answered,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("received ctrl+c, stopping before remaining questions");
                summary.interrupted = true;
                return Ok(summary);
            }
        };

        let result = match answered {
            Ok(result) => result,
            Err(Nl2SqlError::Gateway(err)) => {
                log_gateway_failure(&err);
                return Err(Nl2SqlError::Gateway(err).into());
            }
            Err(err) => return Err(err.into()),
        };

        summary.answered += 1;
        if let QueryResult::Exhausted { .. } = result {
            summary.exhausted += 1;
        }

        if json {
            writeln!(out, "{}", render_json(question, &result)?)?;
        } else {
            writeln!(out, "{}", render_text(&result))?;
        }
    }

    tracing::info!(
        questions = questions.len(),
        exhausted = summary.exhausted,
        "batch complete"
    );

    Ok(summary)
}

fn log_gateway_failure(err: &GatewayError) {
    if err.is_unauthorized() {
        tracing::error!("completion endpoint rejected the credentials: {}", err);
    } else if err.is_rate_limited() {
        tracing::error!("completion endpoint is rate limiting requests: {}", err);
    } else {
        tracing::error!("completion request failed: {}", err);
    }
}

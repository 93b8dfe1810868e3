// src/main.rs
use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use marquee::app::display::{DisplayModel, MediaFacts};
use marquee::app::types::{MediaKind, MediaReference};
use marquee::app::MediaContext;
use marquee::config::load_config;

const USAGE: &str = "Usage: marquee search <query>\n       marquee detail <movie|series|person> <id>\n       marquee genres [id ..]";

fn print_model(model: &DisplayModel) {
    println!("{} ({})", model.title, model.kind.as_str());
    if !model.rating_text.is_empty() {
        println!("  rating:  {} {:?}", model.rating_text, model.rating_tier);
    }
    if !model.genres.is_empty() {
        println!("  genres:  {}", model.genres.join(", "));
    }
    let line = |label: &str, value: &Option<String>| {
        if let Some(v) = value {
            println!("  {label:<8} {v}");
        }
    };
    match &model.facts {
        MediaFacts::Movie {
            runtime,
            release_date,
        } => {
            line("runtime:", runtime);
            line("release:", release_date);
        }
        MediaFacts::Series {
            status,
            year_range,
            season_episode_text,
        } => {
            line("status:", status);
            line("years:", year_range);
            line("length:", season_episode_text);
        }
        MediaFacts::Person {
            known_for_department,
            birth_info,
            age_text,
            deathday,
        } => {
            line("known:", known_for_department);
            line("born:", birth_info);
            line("age:", age_text);
            line("died:", deathday);
        }
    }
    if let Some(img) = &model.image {
        println!("  image:   {}x{}", img.width, img.height);
    }
    println!();
    println!("{}", model.overview);
    if !model.cast.is_empty() {
        println!();
        println!("Cast:");
        for member in &model.cast {
            match &member.character {
                Some(character) => println!("  {} as {character}", member.name),
                None => println!("  {}", member.name),
            }
        }
    }
    if !model.gallery.is_empty() {
        println!();
        println!("Gallery ({} images):", model.gallery.len());
        for url in &model.gallery {
            println!("  {url}");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    Detail(MediaKind, u64),
    Genres(Vec<u32>),
}

/// Validate arguments before anything touches config or the network.
fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Err(USAGE.to_string());
    };
    match command.as_str() {
        "search" => Ok(Command::Search(args[1..].join(" "))),
        "detail" => {
            let (Some(kind), Some(id)) = (args.get(1), args.get(2)) else {
                return Err(USAGE.to_string());
            };
            let kind = MediaKind::from_str(kind).ok_or_else(|| format!("unknown kind `{kind}`"))?;
            let id: u64 = id.parse().map_err(|e| format!("bad id `{id}`: {e}"))?;
            Ok(Command::Detail(kind, id))
        }
        "genres" => args[1..]
            .iter()
            .map(|s| s.parse::<u32>().map_err(|e| format!("bad genre id `{s}`: {e}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Command::Genres),
        other => Err(format!("unknown command `{other}`\n{USAGE}")),
    }
}

async fn run(args: &[String]) -> Result<(), String> {
    let command = parse_command(args)?;

    let cfg = load_config();
    let ctx = MediaContext::build(&cfg).await?;

    match command {
        Command::Search(query) => {
            let results = ctx.search(&query).await.map_err(|e| e.to_string())?;
            for r in &results {
                let title = r.title_fallback.as_deref().unwrap_or("?");
                let id = r.id.map_or_else(|| "-".to_string(), |id| id.to_string());
                println!("{:<7} {id:>9}  {title}", r.kind.as_str());
            }
        }
        Command::Detail(kind, id) => {
            let model = ctx
                .build_display_model(MediaReference::new(Some(id), kind))
                .await;
            print_model(&model);
        }
        Command::Genres(ids) => {
            if ids.is_empty() {
                info!("genre index holds {} entries", ctx.genres().len());
                println!("{} genres cached", ctx.genres().len());
            } else {
                println!("{}", ctx.genre_names(&ids).join(", "));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span, warn};

use ldb_cli::report::{
    counts_table, describe_surface_form, import_table, records_table, status_table,
};
use ldb_model::{PartOfSpeech, SurfaceForm, User, now};
use ldb_store::{
    EditorConfig, ImportRequest, LanguageDatabase, MatchMode, Query, import_word_list,
};

use crate::cli::{
    AddPosArgs, AddUserArgs, ClassifyArgs, DatabaseArg, FindArgs, ImportArgs, InitArgs,
    SurfaceFormArgs,
};

/// State shared by every command.
pub struct Session {
    pub config: EditorConfig,
    pub strict: bool,
}

impl Session {
    /// Open `path`, reporting load warnings, and remember it as the last database.
    fn open(&mut self, path: &Path) -> Result<LanguageDatabase> {
        let outcome = LanguageDatabase::open_with(path, self.config.database_options())
            .with_context(|| format!("open {}", path.display()))?;
        for warning in &outcome.warnings {
            warn!(path = %path.display(), %warning, "load warning");
            eprintln!("warning: {}: {warning}", path.display());
        }
        let db = if self.strict {
            outcome
                .into_strict()
                .with_context(|| format!("open {} in strict mode", path.display()))?
        } else {
            outcome.database
        };
        self.remember(path);
        Ok(db)
    }

    fn remember(&mut self, path: &Path) {
        self.config.previous_database_path = Some(path.to_path_buf());
    }

    fn database_path(&self, arg: &DatabaseArg) -> Result<PathBuf> {
        arg.database
            .clone()
            .or_else(|| self.config.previous_database_path.clone())
            .ok_or_else(|| anyhow!("no database given and none used before"))
    }
}

fn save(db: &mut LanguageDatabase) -> Result<()> {
    let path = db.save(None).context("save database")?;
    info!(path = %path.display(), "database saved");
    Ok(())
}

pub fn run_init(session: &mut Session, args: &InitArgs) -> Result<()> {
    if args.database.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.database.display()
        );
    }
    let mut db = LanguageDatabase::with_options(args.lang.as_str(), session.config.database_options());
    db.save(Some(&args.database))
        .with_context(|| format!("create {}", args.database.display()))?;
    session.remember(&args.database);
    println!("{db}");
    Ok(())
}

pub fn run_info(session: &mut Session, args: &DatabaseArg) -> Result<()> {
    let path = session.database_path(args)?;
    let db = session.open(&path)?;
    println!("{db}");
    println!("{}", counts_table(&db));
    if !db.surface_forms().is_empty() {
        println!("{}", status_table(&db));
    }
    Ok(())
}

pub fn run_find(session: &mut Session, args: &FindArgs) -> Result<()> {
    let db = session.open(&args.database)?;
    let mut query = Query::by_id(args.id.unwrap_or_default()).with_mode(if args.all {
        MatchMode::All
    } else {
        MatchMode::Any
    });
    if let Some(section) = args.section {
        query = query.in_section(section);
    }
    for (field, value) in &args.conditions {
        query = query.field(field.as_str(), value.as_str());
    }

    let found = db.find(&query);
    if found.is_empty() {
        println!("No matching records.");
    } else {
        println!("{}", records_table(&found));
    }
    Ok(())
}

pub fn run_import(session: &mut Session, args: &ImportArgs) -> Result<()> {
    let span = info_span!("import", word_list = %args.word_list.display());
    let _guard = span.enter();
    let mut db = session.open(&args.database)?;

    let name = args.name.clone().unwrap_or_else(|| {
        args.word_list
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<unknown>".to_string())
    });
    let mut request = ImportRequest::new(name).with_user(session.config.user_id);
    if let Some(description) = &args.description {
        request = request.with_description(description.as_str());
    }

    let summary = import_word_list(&mut db, &args.word_list, &request)
        .with_context(|| format!("import {}", args.word_list.display()))?;
    save(&mut db)?;
    println!("Source #{}", summary.source_id);
    println!("{}", import_table(&summary));
    Ok(())
}

pub fn run_add_user(session: &mut Session, args: &AddUserArgs) -> Result<()> {
    let mut db = session.open(&args.database)?;
    let id = db
        .add_user(User::new(args.name.as_str()))
        .context("add user")?;
    save(&mut db)?;
    println!("User #{id} {:?}", args.name);
    Ok(())
}

pub fn run_add_pos(session: &mut Session, args: &AddPosArgs) -> Result<()> {
    let mut db = session.open(&args.database)?;
    let mut pos = PartOfSpeech::new(args.name.as_str());
    pos.shortcut = args.shortcut.clone();
    pos.remarks = args.remarks.clone();
    let id = db.add_part_of_speech(pos).context("add part of speech")?;
    save(&mut db)?;
    println!("Part of speech #{id} {:?}", args.name);
    Ok(())
}

pub fn run_classify(session: &mut Session, args: &ClassifyArgs) -> Result<()> {
    let mut db = session.open(&args.database)?;
    let user_id = session.config.user_id;
    let at = now();

    let pos_id = match &args.pos {
        Some(name) => {
            let (id, created) = db
                .find_or_create_part_of_speech(name, None, session.config.may_create_pos)
                .context("part of speech")?;
            if created {
                println!("New part of speech #{id} {name:?}");
            }
            id
        }
        None => 0,
    };
    let (root_id, created) = db
        .find_or_create_root(&args.root, pos_id, user_id, at)
        .context("root")?;
    if created {
        println!("New root #{root_id} {:?}", args.root);
    }
    db.classify_surface_form(args.surface_form, root_id, user_id, at)
        .context("classify")?;
    save(&mut db)?;

    if let Some(sf) = db.get::<SurfaceForm>(args.surface_form) {
        println!("{}", describe_surface_form(&db, sf));
    }
    Ok(())
}

pub fn run_ignore(session: &mut Session, args: &SurfaceFormArgs) -> Result<()> {
    let mut db = session.open(&args.database)?;
    db.ignore_surface_form(args.surface_form, now())
        .context("ignore")?;
    save(&mut db)?;
    if let Some(sf) = db.get::<SurfaceForm>(args.surface_form) {
        println!("{}", describe_surface_form(&db, sf));
    }
    Ok(())
}

pub fn run_reject(session: &mut Session, args: &SurfaceFormArgs) -> Result<()> {
    let mut db = session.open(&args.database)?;
    db.reject_surface_form(args.surface_form, now())
        .context("reject")?;
    save(&mut db)?;
    if let Some(sf) = db.get::<SurfaceForm>(args.surface_form) {
        println!("{}", describe_surface_form(&db, sf));
    }
    Ok(())
}

pub fn run_next(session: &mut Session, args: &DatabaseArg) -> Result<()> {
    let path = session.database_path(args)?;
    let db = session.open(&path)?;
    match db.next_todo() {
        Some(sf) => println!("{}", describe_surface_form(&db, sf)),
        None => println!("Nothing left to classify."),
    }
    Ok(())
}

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::api::{NoteListService, NotesApi};
use crate::cache::QueryCache;
use crate::config::{find_project_root, Config, CONFIG_FILE, NOTEHUB_DIR};
use crate::draft::{DraftStore, FileDraftStore};
use crate::entity::{FetchNotesParams, Note, NoteDraft, NoteTag};
use crate::error::{NotehubError, Result};
use crate::form::{NoteFormController, NoteFormProps};
use crate::mutation::CreateNoteMutation;
use crate::validation::FormField;

use super::Backend;

/// Loaded config plus the project root it came from.
struct Context {
    root: PathBuf,
    config: Config,
}

impl Context {
    fn load() -> Result<Self> {
        let root = find_project_root();
        let config = Config::load(&root)?;
        debug!(root = %root.display(), base_url = %config.base_url, "loaded context");
        Ok(Self { root, config })
    }

    fn draft_store(&self) -> FileDraftStore {
        FileDraftStore::new(self.config.resolve_draft_path(&self.root))
    }

    fn backend(&self, offline: bool) -> Result<Backend> {
        Backend::from_config(&self.config, offline)
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn parse_tag(raw: &str) -> Result<NoteTag> {
    raw.parse().map_err(|_| {
        NotehubError::InvalidTag(format!("{} (expected one of {})", raw, NoteTag::labels()))
    })
}

/// First seven characters of an id. Ids are opaque and may not be ASCII.
fn short_id(id: &str) -> &str {
    id.char_indices().nth(7).map_or(id, |(i, _)| &id[..i])
}

fn print_note_line(note: &Note) {
    println!("  {} [{}] {}", short_id(&note.id), note.tag, note.title);
}

pub fn handle_init() -> Result<()> {
    let root = std::env::current_dir()?;
    init_at(&root)?;
    println!("Initialized notehub project in {}", root.display());
    Ok(())
}

fn init_at(root: &Path) -> Result<()> {
    let dir = root.join(NOTEHUB_DIR);
    if dir.exists() {
        return Err(NotehubError::AlreadyInitialized);
    }
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(CONFIG_FILE), serde_yaml::to_string(&Config::default())?)?;
    Ok(())
}

pub fn handle_draft_show(json: bool) -> Result<()> {
    let ctx = Context::load()?;
    let draft = ctx.draft_store().read_draft();

    if json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    } else if draft.is_empty() {
        println!("No pending draft.");
    } else {
        println!("Pending draft:");
        println!("  title:   {}", draft.title.as_deref().unwrap_or("-"));
        println!(
            "  tag:     {}",
            draft.tag.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
        );
        println!("  content: {}", draft.content.as_deref().unwrap_or("-"));
    }
    Ok(())
}

pub fn handle_draft_set(
    title: Option<String>,
    content: Option<String>,
    tag: Option<String>,
) -> Result<()> {
    let tag = tag.as_deref().map(parse_tag).transpose()?;
    let partial = NoteDraft { title, content, tag };
    if partial.is_empty() {
        println!("Nothing to set. Pass --title, --content or --tag.");
        return Ok(());
    }

    let ctx = Context::load()?;
    ctx.draft_store().set_draft(partial)?;
    println!("Draft saved.");
    Ok(())
}

pub fn handle_draft_clear() -> Result<()> {
    let ctx = Context::load()?;
    ctx.draft_store().clear_draft()?;
    println!("Draft cleared.");
    Ok(())
}

pub fn handle_create(
    title: Option<String>,
    content: Option<String>,
    tag: Option<String>,
    stdin: bool,
    json: bool,
    offline: bool,
) -> Result<()> {
    let ctx = Context::load()?;
    let drafts: Arc<dyn DraftStore> = Arc::new(ctx.draft_store());
    let api = Arc::new(ctx.backend(offline)?);
    let mutation = CreateNoteMutation::new(api, QueryCache::new());
    let mut form = NoteFormController::mount(drafts, mutation.clone(), NoteFormProps::default());

    let content = if stdin {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Some(buf.trim_end().to_string())
    } else {
        content
    };

    // accept any case on the command line; unknown tags go through as typed
    // so validation reports them
    let tag = tag.map(|raw| match raw.parse::<NoteTag>() {
        Ok(t) => t.to_string(),
        Err(_) => raw,
    });

    // each flag is one edit, persisted to the draft as it is applied
    for (field, value) in [
        (FormField::Title, title),
        (FormField::Content, content),
        (FormField::Tag, tag),
    ] {
        if let Some(value) = value {
            form.change_field(field, value)?;
        }
    }

    if !form.is_dirty() {
        eprintln!("Nothing to submit: no field differs from the saved draft.");
        eprintln!("Pass --title, --content or --tag to edit the note.");
        return Err(NotehubError::SubmitBlocked);
    }
    if !form.is_valid() {
        for error in form.errors().iter() {
            eprintln!("  {}: {}", error.field, error.message);
        }
        eprintln!("Draft saved; fix the fields above and run create again.");
        return Err(NotehubError::Validation(form.errors().clone()));
    }

    let rt = runtime()?;
    let values = form.begin_submit()?;
    eprintln!("{}", form.submit_label());
    let outcome = rt.block_on(mutation.create_note(&values));
    let note = match form.complete_submit(outcome) {
        Ok(note) => note,
        Err(e) => {
            if e.is_submission_failure() {
                eprintln!("Draft kept; run create again to retry.");
            }
            return Err(e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!(
            "Created note ({}) [{}] {}",
            short_id(&note.id),
            note.tag,
            note.title
        );
    }
    Ok(())
}

pub fn handle_list(
    tag: Option<String>,
    search: Option<String>,
    page: u32,
    json: bool,
    offline: bool,
) -> Result<()> {
    let tag = match tag {
        Some(raw) => FetchNotesParams::parse_tag_filter(&raw)
            .map_err(|_| NotehubError::InvalidTag(raw.clone()))?,
        None => None,
    };
    let params = FetchNotesParams {
        search,
        tag,
        page: page.max(1),
        ..Default::default()
    };

    let ctx = Context::load()?;
    let service = NoteListService::new(Arc::new(ctx.backend(offline)?), QueryCache::new());
    let rt = runtime()?;
    let list = rt.block_on(service.list(&params))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.notes.is_empty() {
        println!("No notes found.");
        return Ok(());
    }

    let heading = params
        .tag
        .map(|t| format!("Notes tagged {}", t))
        .unwrap_or_else(|| "All notes".to_string());
    println!("{} (page {} of {}):\n", heading, params.page, list.total_pages.max(1));
    for note in &list.notes {
        print_note_line(note);
    }
    Ok(())
}

pub fn handle_get(id: String, json: bool, offline: bool) -> Result<()> {
    let ctx = Context::load()?;
    let api = ctx.backend(offline)?;
    let rt = runtime()?;
    let note = rt.block_on(api.fetch_note_by_id(&id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("{} [{}]", note.title, note.tag);
        println!("id:      {}", note.id);
        println!("created: {}", note.created_at.format("%Y-%m-%d %H:%M"));
        println!("updated: {}", note.updated_at.format("%Y-%m-%d %H:%M"));
        if !note.content.is_empty() {
            println!("\n{}", note.content);
        }
    }
    Ok(())
}

pub fn handle_delete(id: String, force: bool, offline: bool) -> Result<()> {
    // Confirm deletion unless --force is used
    if !force {
        eprintln!("Delete note {}? [y/N] ", id);

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(NotehubError::ConfirmationRequired);
        }
    }

    let ctx = Context::load()?;
    let api = ctx.backend(offline)?;
    let rt = runtime()?;
    let note = rt.block_on(api.delete_note(&id))?;

    println!("Deleted note ({}) - {}", short_id(&note.id), note.title);
    Ok(())
}

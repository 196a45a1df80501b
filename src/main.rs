use clap::Parser;
use notehub::cli::{
    handle_create, handle_delete, handle_draft_clear, handle_draft_set, handle_draft_show,
    handle_get, handle_init, handle_list, Cli, Commands, DraftAction,
};

fn main() {
    notehub::logging::init();
    let cli = Cli::parse();
    let offline = cli.offline;

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Draft(draft) => match draft.action {
            DraftAction::Show { json } => handle_draft_show(json),
            DraftAction::Set {
                title,
                content,
                tag,
            } => handle_draft_set(title, content, tag),
            DraftAction::Clear => handle_draft_clear(),
        },
        Commands::Create {
            title,
            content,
            tag,
            stdin,
            json,
        } => handle_create(title, content, tag, stdin, json, offline),
        Commands::List {
            tag,
            search,
            page,
            json,
        } => handle_list(tag, search, page, json, offline),
        Commands::Get { id, json } => handle_get(id, json, offline),
        Commands::Delete { id, force } => handle_delete(id, force, offline),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use atlas_lists::catalog::{ItemStyle, ListPanelView};
use atlas_lists::controller::{DEFAULT_UPLOAD_LIMIT_BYTES, ListController};
use atlas_lists::list_record::ListKind;
use atlas_lists::list_store::ListStore;
use atlas_lists::preset::HttpPresetProvider;
use atlas_lists::range_compress;
use atlas_lists::CatalogEntry;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::{env, fs};

const DEFAULT_DATA_DIR: &str = ".atlas_lists";
const DEFAULT_API_URL: &str = "https://atlas.example.org/rest";

fn usage() {
    eprintln!(
        "Usage:\n  \
  atlas_lists_cli [options] catalog\n  \
  atlas_lists_cli [options] show NAME\n  \
  atlas_lists_cli [options] create-empty\n  \
  atlas_lists_cli [options] import FILE\n  \
  atlas_lists_cli [options] rename OLD NEW\n  \
  atlas_lists_cli [options] remove NAME --yes\n  \
  atlas_lists_cli [options] reset --yes\n  \
  atlas_lists_cli [options] duplicate NAME\n  \
  atlas_lists_cli compress ID[,ID...]\n\n  \
Options:\n  \
  --data-dir PATH   List store directory (default {DEFAULT_DATA_DIR})\n  \
  --api URL         Preset API base URL\n  \
  --scope SPECIES   Scope the lists belong to (required for list commands)\n  \
  --kind gene|generic   Persisted bucket (default gene)\n  \
  --plain           Render names only, without item counts"
    );
}

/// Terminal rendering of one list panel. The item style is fixed when the
/// panel is constructed.
struct TextPanel {
    style: ItemStyle,
    entries: Vec<CatalogEntry>,
    selected: Option<String>,
}

impl TextPanel {
    fn new(style: ItemStyle) -> Self {
        Self {
            style,
            entries: Vec::new(),
            selected: None,
        }
    }

    fn print(&self) {
        let mut group = String::new();
        for entry in &self.entries {
            if entry.group != group {
                println!("{}:", atlas_lists::catalog::group_label(&entry.group));
                group = entry.group.clone();
            }
            let marker = if self.selected.as_deref() == Some(entry.name.as_str()) {
                "*"
            } else {
                " "
            };
            println!("  {marker} {}", entry.label(self.style));
        }
    }
}

impl ListPanelView for TextPanel {
    fn clear_dynamic(&mut self) {
        self.entries
            .retain(|entry| entry.origin == atlas_lists::ListOrigin::Preset);
        if let Some(name) = &self.selected {
            if !self.entries.iter().any(|entry| entry.name == *name) {
                self.selected = None;
            }
        }
    }

    fn append_heading(&mut self, _label: &str) {}

    fn append_item(&mut self, entry: &CatalogEntry, active: bool) {
        self.entries.push(entry.clone());
        if active {
            self.selected = Some(entry.name.clone());
        }
    }

    fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    fn select_first(&mut self) {
        self.selected = self.entries.first().map(|entry| entry.name.clone());
    }
}

struct Options {
    data_dir: String,
    api_url: String,
    scope: Option<String>,
    kind: ListKind,
    plain: bool,
    yes: bool,
    rest: Vec<String>,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        data_dir: DEFAULT_DATA_DIR.to_string(),
        api_url: DEFAULT_API_URL.to_string(),
        scope: None,
        kind: ListKind::Gene,
        plain: false,
        yes: false,
        rest: Vec::new(),
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data-dir" => {
                options.data_dir = iter
                    .next()
                    .ok_or("--data-dir requires a path")?
                    .to_string();
            }
            "--api" => {
                options.api_url = iter.next().ok_or("--api requires a URL")?.to_string();
            }
            "--scope" => {
                options.scope = Some(iter.next().ok_or("--scope requires a value")?.to_string());
            }
            "--kind" => match iter.next().map(String::as_str) {
                Some("gene") => options.kind = ListKind::Gene,
                Some("generic") => options.kind = ListKind::Generic,
                _ => return Err("--kind must be 'gene' or 'generic'".to_string()),
            },
            "--plain" => options.plain = true,
            "--yes" => options.yes = true,
            other => options.rest.push(other.to_string()),
        }
    }
    Ok(options)
}

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("Could not initialize logger");

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        usage();
        return Err("Missing command".to_string());
    }

    let options = parse_options(&args)?;
    let mut rest = options.rest.iter();
    let command = rest.next().ok_or_else(|| {
        usage();
        "Missing command".to_string()
    })?;

    // Range compression needs no store, scope, or network.
    if command == "compress" {
        let raw = rest.next().ok_or("compress requires a comma-separated list")?;
        let ids: Vec<&str> = raw.split(',').collect();
        println!("{}", range_compress::compress(&ids));
        return Ok(());
    }

    let scope = options
        .scope
        .clone()
        .ok_or("--scope is required for list commands")?;
    let style = if options.plain {
        ItemStyle::NameOnly
    } else {
        ItemStyle::Detailed
    };
    let store = ListStore::new(&options.data_dir);
    let provider = HttpPresetProvider::new(&options.api_url);
    let mut controller =
        ListController::new(options.kind, store, provider, TextPanel::new(style));

    if let Err(e) = controller.load_panel(&scope) {
        // A panel with no reachable preset API still manages user lists.
        log::warn!("Preset lists unavailable: {e}");
    }

    match command.as_str() {
        "catalog" => {}
        "show" => {
            let name = rest.next().ok_or("show requires a list name")?;
            let members = controller
                .members_of(&scope, name)
                .map_err(|e| e.to_string())?;
            for member in members {
                println!("{member}");
            }
            return Ok(());
        }
        "create-empty" => {
            let name = controller.create_empty(&scope).map_err(|e| e.to_string())?;
            println!("Created {name}");
        }
        "import" => {
            let path = rest.next().ok_or("import requires a file path")?;
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Could not read upload '{path}': {e}"))?;
            let created = controller
                .create_from_upload(&scope, &text, DEFAULT_UPLOAD_LIMIT_BYTES)
                .map_err(|e| e.to_string())?;
            println!("Imported {} list(s) from {path}", created.len());
        }
        "rename" => {
            let old = rest.next().ok_or("rename requires the current name")?;
            let new = rest.next().ok_or("rename requires the new name")?;
            controller
                .rename(&scope, old, new)
                .map_err(|e| e.to_string())?;
            println!("Renamed {old} to {new}");
        }
        "remove" => {
            let name = rest.next().ok_or("remove requires a list name")?;
            let removed = controller
                .remove(&scope, name, |_| options.yes)
                .map_err(|e| e.to_string())?;
            if removed {
                println!("Removed {name}");
            } else {
                println!("Cancelled; pass --yes to remove {name}");
            }
        }
        "reset" => {
            let reset = controller
                .reset_all(&scope, |_| options.yes)
                .map_err(|e| e.to_string())?;
            if reset {
                println!("Removed all user lists for {scope}");
            } else {
                println!("Cancelled; pass --yes to reset {scope}");
            }
        }
        "duplicate" => {
            let name = rest.next().ok_or("duplicate requires a list name")?;
            match controller.duplicate(&scope, name).map_err(|e| e.to_string())? {
                Some(copy) => println!("Created {copy}"),
                None => println!("Discarded stale copy of {name}"),
            }
        }
        other => {
            usage();
            return Err(format!("Unknown command '{other}'"));
        }
    }

    if let Some(notification) = controller.take_notification() {
        eprintln!("{notification}");
    }
    controller.view().print();
    Ok(())
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use penetapan_drafter::{
    check_deps, emit_export, load_config, load_form, nala_help_for, render_first_page, render_preview, save_form,
    write_artifact,
    build_document, Config, DrafterError, FormRecord, FormUpdate, GeminiClient, Session,
};
use serde_json::json;

const PAGE_IMAGE_ARTIFACT: &str = "page-1.jpg";

#[derive(Parser)]
#[command(name = "penetapan")]
#[command(about = "Draft court determinations with a text generator and export them to .docx")]
struct Cli {
    /// Config file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "drafter.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default form file
    Init {
        #[arg(long)]
        form: PathBuf,
    },
    /// Apply key=value updates to a form
    Set {
        #[arg(long)]
        form: PathBuf,
        #[arg(required = true)]
        updates: Vec<String>,
    },
    /// Print the generation instruction
    Prompt {
        #[arg(long)]
        form: PathBuf,
    },
    /// Render page 1 of a PDF, extract fields and merge them into the form
    Extract {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        pdf: PathBuf,
    },
    /// Call the generator and save the text
    Generate {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Turn generated text into a .docx
    Export {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        text: PathBuf,
        #[arg(long)]
        outdir: Option<String>,
        #[arg(long)]
        dump_steps: bool,
    },
    /// Generate and export in one go
    Run {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        outdir: Option<String>,
        #[arg(long)]
        dump_steps: bool,
    },
    /// Print the classified document as plain text
    Preview {
        #[arg(long)]
        text: PathBuf,
    },
    /// Report pdftoppm availability
    CheckDeps,
}

fn fail(tool: &str, error: String, error_code: &str, exit: i32) -> ! {
    eprintln!("{}", json!({ "tool": tool, "error": error, "error_code": error_code }));
    std::process::exit(exit);
}

fn drafter_exit(e: &DrafterError) -> i32 {
    match e {
        DrafterError::Generation { .. } => 4,
        DrafterError::Export(_) => 6,
        _ => 1,
    }
}

fn fail_drafter(tool: &str, e: DrafterError) -> ! {
    let detail = match &e {
        DrafterError::Generation { source, .. } => Some(source.to_string()),
        _ => None,
    };
    eprintln!(
        "{}",
        json!({ "tool": tool, "error": e.to_string(), "error_code": e.code(), "detail": detail })
    );
    std::process::exit(drafter_exit(&e));
}

fn read_form(path: &Path) -> FormRecord {
    match load_form(path) {
        Ok(f) => f,
        Err(e) => fail("load_form", e.to_string(), "InvalidForm", 1),
    }
}

fn read_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => fail("read_text", format!("{}: {}", path.display(), e), "ReadFailed", 1),
    }
}

fn client(cfg: &Config) -> GeminiClient {
    GeminiClient::new(&cfg.generator.endpoint, &cfg.generator.model, cfg.api_key())
}

fn dump_dir(cfg: &Config, outdir: &str) -> PathBuf {
    cfg.artifacts_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(outdir).join("artifacts"))
}

fn dump(dir: &Path, name: &str, body: &[u8]) {
    match write_artifact(dir, name, body) {
        Ok(path) => eprintln!("{}", json!({ "tool": "dump_steps", "path": path })),
        Err(e) => eprintln!("{}", json!({ "tool": "dump_steps", "path": name, "error": e.to_string() })),
    }
}

fn export_session(session: &Session, cfg: &Config, outdir: Option<String>, dump_steps: bool) {
    let outdir = outdir.unwrap_or_else(|| cfg.output_dir().to_string());
    let artifact = match session.export() {
        Ok(a) => a,
        Err(e) => fail_drafter("export", e),
    };
    eprintln!(
        "{}",
        json!({
            "tool": "classify",
            "paragraphs": artifact.build.tree.body.len(),
            "found": artifact.build.found,
        })
    );

    if dump_steps {
        let dir = dump_dir(cfg, &outdir);
        dump(&dir, "prompt.txt", session.prompt().as_bytes());
        dump(&dir, "generated.txt", session.generated.as_deref().unwrap_or("").as_bytes());
        match serde_json::to_vec_pretty(&artifact.build.trace) {
            Ok(body) => dump(&dir, "trace.json", &body),
            Err(e) => eprintln!("{}", json!({ "tool": "dump_steps", "path": "trace.json", "error": e.to_string() })),
        }
    }

    let meta = session.export_meta(&artifact);
    match emit_export(&artifact.bytes, &meta, &outdir, &artifact.filename) {
        Ok(paths) => {
            eprintln!(
                "{}",
                json!({ "tool": "emit_export", "docx": paths.docx_path, "meta": paths.meta_path, "bytes": artifact.bytes.len() })
            );
            println!("{}", paths.docx_path);
        }
        Err(e) => fail("emit_export", e.to_string(), "WriteFailed", 6),
    }
}

fn generate_into(session: &mut Session, cfg: &Config) {
    let generator = client(cfg);
    eprintln!("{}", json!({ "tool": "generate", "model": generator.model, "status": "started" }));
    match session.generate(&generator) {
        Ok(text) => eprintln!("{}", json!({ "tool": "generate", "status": "ok", "chars": text.chars().count() })),
        Err(e) => fail_drafter("generate", e),
    }
}

fn main() {
    let cli = Cli::parse();

    let cfg = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => fail("load_config", e.to_string(), "InvalidConfig", 3),
    };
    eprintln!(
        "{}",
        json!({
            "tool": "load_config",
            "file": cli.config.display().to_string(),
            "status": "ok",
            "model": cfg.generator.model,
            "output_dir": cfg.output_dir(),
        })
    );

    match cli.command {
        Command::Init { form } => {
            if let Err(e) = save_form(&FormRecord::default(), &form) {
                fail("init", e.to_string(), "WriteFailed", 6);
            }
            eprintln!("{}", json!({ "tool": "init", "form": form.display().to_string(), "status": "ok" }));
        }
        Command::Set { form, updates } => {
            let mut session = Session::new(read_form(&form));
            for raw in &updates {
                let Some((key, value)) = raw.split_once('=') else {
                    fail("set", format!("expected key=value, got {raw}"), "InvalidUpdate", 1);
                };
                let update = match FormUpdate::parse(key.trim(), value) {
                    Ok(u) => u,
                    Err(e) => fail("set", e.to_string(), "InvalidUpdate", 1),
                };
                if let Err(e) = session.apply(update) {
                    fail_drafter("set", e);
                }
            }
            if let Err(e) = save_form(&session.form, &form) {
                fail("set", e.to_string(), "WriteFailed", 6);
            }
            eprintln!("{}", json!({ "tool": "set", "applied": updates.len(), "status": "ok" }));
        }
        Command::Prompt { form } => {
            let session = Session::new(read_form(&form));
            println!("{}", session.prompt());
        }
        Command::Extract { form, pdf } => {
            let deps = check_deps();
            if !deps.ok {
                eprintln!(
                    "{}",
                    json!({
                        "tool": "check_deps",
                        "missing": deps.missing,
                        "error_code": "MissingDependency",
                        "help": nala_help_for(&deps.missing),
                    })
                );
                std::process::exit(2);
            }
            let mut session = Session::new(read_form(&form));
            let image = match render_first_page(&pdf, cfg.render.dpi) {
                Ok(i) => i,
                Err(e) => fail_drafter("extract", e.into()),
            };
            if let Some(dir) = cfg.artifacts_dir() {
                dump(dir, PAGE_IMAGE_ARTIFACT, &image.bytes);
            }
            let report = match session.extract(&client(&cfg), &image) {
                Ok(r) => r,
                Err(e) => fail_drafter("extract", e),
            };
            if let Err(e) = save_form(&session.form, &form) {
                fail("extract", e.to_string(), "WriteFailed", 6);
            }
            eprintln!(
                "{}",
                json!({ "tool": "extract", "pdf": pdf.display().to_string(), "applied": report.applied, "ignored": report.ignored })
            );
        }
        Command::Generate { form, out } => {
            let mut session = Session::new(read_form(&form));
            generate_into(&mut session, &cfg);
            let text = session.generated.as_deref().unwrap_or("");
            if let Err(e) = std::fs::write(&out, text) {
                fail("generate", e.to_string(), "WriteFailed", 6);
            }
            eprintln!("{}", json!({ "tool": "generate", "out": out.display().to_string() }));
        }
        Command::Export { form, text, outdir, dump_steps } => {
            let session = Session::with_text(read_form(&form), read_text(&text));
            export_session(&session, &cfg, outdir, dump_steps);
        }
        Command::Run { form, outdir, dump_steps } => {
            let mut session = Session::new(read_form(&form));
            generate_into(&mut session, &cfg);
            export_session(&session, &cfg, outdir, dump_steps);
        }
        Command::Preview { text } => {
            let build = build_document(&read_text(&text));
            eprintln!("{}", json!({ "tool": "classify", "paragraphs": build.tree.body.len(), "found": build.found }));
            print!("{}", render_preview(&build.tree));
        }
        Command::CheckDeps => {
            let deps = check_deps();
            println!("{}", json!({ "tool": "check_deps", "ok": deps.ok, "missing": deps.missing }));
            if !deps.ok {
                eprintln!("{}", nala_help_for(&deps.missing));
                std::process::exit(2);
            }
        }
    }
}

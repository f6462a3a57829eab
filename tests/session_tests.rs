use std::cell::RefCell;

use penetapan_drafter::form::PenetapanKind;
use penetapan_drafter::session::{AANMANING_FAILURE, GENERIC_FAILURE};
use penetapan_drafter::{
    emit_export, export_filename, sha256_hex, DocumentKind, DrafterError, FieldExtractor, FormRecord, GenerateError,
    PageImage, PartialRecord, RenderError, Session, TextGenerator,
};

struct StubGenerator {
    reply: Result<String, String>,
    seen: RefCell<Vec<String>>,
}

impl StubGenerator {
    fn ok(text: &str) -> Self {
        StubGenerator { reply: Ok(text.to_string()), seen: RefCell::new(Vec::new()) }
    }
    fn failing() -> Self {
        StubGenerator { reply: Err("quota".to_string()), seen: RefCell::new(Vec::new()) }
    }
}

impl TextGenerator for StubGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.seen.borrow_mut().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(|message| GenerateError::Service { status: 429, message })
    }
}

struct StubExtractor(Option<PartialRecord>);

impl FieldExtractor for StubExtractor {
    fn extract(&self, _image: &PageImage) -> Result<PartialRecord, GenerateError> {
        self.0.clone().ok_or_else(|| GenerateError::Malformed("not json".into()))
    }
}

const TEXT: &str = "PENGADILAN NEGERI BANDUNG\n\nPENETAPAN\nNomor 1/Pdt.Eks/2024/PN Bdg\n\nMENETAPKAN:\n- Mengabulkan permohonan;";

#[test]
fn filename_replaces_spaces_slashes_and_dots() {
    assert_eq!(
        export_filename(DocumentKind::BeritaAcara, "1/Pdt.Eks/2024/PN Bdg"),
        "Berita_Acara_1_Pdt_Eks_2024_PN Bdg.docx"
    );
    assert_eq!(export_filename(DocumentKind::Penetapan, ""), "Penetapan_.docx");
}

#[test]
fn generate_sends_the_built_prompt_and_keeps_text() {
    let mut session = Session::new(FormRecord::default());
    let stub = StubGenerator::ok(TEXT);
    let text = session.generate(&stub).expect("generated").to_string();
    assert_eq!(text, TEXT);
    assert_eq!(session.generated.as_deref(), Some(TEXT));
    assert_eq!(stub.seen.borrow().as_slice(), &[session.prompt()]);
}

#[test]
fn failed_generation_keeps_previous_text() {
    let mut session = Session::with_text(FormRecord::default(), "teks lama");
    let err = session.generate(&StubGenerator::failing()).unwrap_err();
    assert_eq!(err.to_string(), format!("Gagal menghasilkan teks: {AANMANING_FAILURE}"));
    assert!(matches!(err, DrafterError::Generation { .. }));
    assert_eq!(session.generated.as_deref(), Some("teks lama"));
}

#[test]
fn generic_failure_message_for_other_kinds() {
    let mut form = FormRecord::default();
    form.jenis_penetapan = Some(PenetapanKind::Lelang);
    let mut session = Session::new(form);
    let err = session.generate(&StubGenerator::failing()).unwrap_err();
    assert_eq!(err.to_string(), format!("Gagal menghasilkan teks: {GENERIC_FAILURE}"));
    assert!(session.generated.is_none());
}

#[test]
fn extraction_merges_and_reports() {
    let mut session = Session::new(FormRecord::default());
    let partial: PartialRecord = [
        ("nomorPerkara".to_string(), "1/Pdt.Eks/2024/PN Bdg".to_string()),
        ("catatan".to_string(), "x".to_string()),
    ]
    .into_iter()
    .collect();
    let report = session
        .extract(&StubExtractor(Some(partial)), &PageImage::jpeg(vec![0xff, 0xd8]))
        .expect("extracted");
    assert_eq!(session.form.nomor_perkara, "1/Pdt.Eks/2024/PN Bdg");
    assert_eq!(report.ignored, vec!["catatan".to_string()]);
}

#[test]
fn failed_extraction_leaves_form_alone() {
    let mut session = Session::new(FormRecord::default());
    let before = session.form.clone();
    let err = session.extract(&StubExtractor(None), &PageImage::jpeg(vec![1])).unwrap_err();
    assert!(err.to_string().starts_with("Gagal memproses PDF: "));
    assert_eq!(session.form, before);
}

#[test]
fn missing_pdf_is_an_extraction_error() {
    let mut session = Session::new(FormRecord::default());
    let td = tempfile::tempdir().unwrap();
    let err = session
        .extract_pdf(&StubExtractor(Some(PartialRecord::new())), &td.path().join("tidak-ada.pdf"), 108)
        .unwrap_err();
    assert!(matches!(err, DrafterError::Extraction(_)));
}

#[test]
fn missing_rasterizer_maps_to_page_image_message() {
    let err: DrafterError = RenderError::ToolMissing("pdftoppm".into()).into();
    assert_eq!(err.to_string(), "Gagal memproses PDF: Tidak dapat membuat gambar halaman.");
}

#[test]
fn export_without_text_is_refused() {
    let session = Session::new(FormRecord::default());
    let err = session.export().unwrap_err();
    assert_eq!(err.to_string(), "Tidak ada teks untuk diekspor. Silakan buat dokumen terlebih dahulu.");
    let blank = Session::with_text(FormRecord::default(), "  \n ");
    assert!(matches!(blank.export(), Err(DrafterError::NothingToExport)));
}

#[test]
fn export_emits_docx_and_meta_atomically() {
    let mut form = FormRecord::default();
    form.nomor_perkara = "1/Pdt.Eks/2024/PN Bdg".into();
    let session = Session::with_text(form, TEXT);
    let artifact = session.export().expect("export");
    assert_eq!(artifact.filename, "Penetapan_1_Pdt_Eks_2024_PN Bdg.docx");
    assert_eq!(artifact.build.tree.body.len(), TEXT.split('\n').count() - 1);

    let meta = session.export_meta(&artifact);
    assert_eq!(meta["kind"], "Penetapan");
    assert_eq!(meta["text_sha256"], sha256_hex(TEXT.as_bytes()));
    assert_eq!(meta["found"]["disposition"], true);
    assert_eq!(meta["found"]["list_items"], 1);

    let td = tempfile::tempdir().unwrap();
    let outdir = td.path().join("out");
    let paths = emit_export(&artifact.bytes, &meta, outdir.to_str().unwrap(), &artifact.filename).expect("emit");
    assert!(paths.docx_path.ends_with("Penetapan_1_Pdt_Eks_2024_PN Bdg.docx"));
    assert!(paths.meta_path.ends_with("Penetapan_1_Pdt_Eks_2024_PN Bdg.meta.json"));
    assert_eq!(std::fs::read(&paths.docx_path).unwrap(), artifact.bytes);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&paths.meta_path).unwrap()).unwrap();
    assert_eq!(written, meta);

    let mut entries: Vec<String> = std::fs::read_dir(&outdir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec!["Penetapan_1_Pdt_Eks_2024_PN Bdg.docx", "Penetapan_1_Pdt_Eks_2024_PN Bdg.meta.json"]
    );

    // a second export replaces both files in place
    emit_export(&artifact.bytes, &meta, outdir.to_str().unwrap(), &artifact.filename).expect("re-emit");
    assert_eq!(std::fs::read_dir(&outdir).unwrap().count(), 2);
}

#[test]
fn exporting_twice_is_stable() {
    let session = Session::with_text(FormRecord::default(), TEXT);
    let a = session.export().unwrap();
    let b = session.export().unwrap();
    assert_eq!(a.filename, b.filename);
    assert_eq!(a.build.tree, b.build.tree);
    assert_eq!(session.export_meta(&a)["text_sha256"], session.export_meta(&b)["text_sha256"]);
    assert!(a.bytes.starts_with(b"PK"));
}

use penetapan_drafter::form::{BeritaAcaraKind, PenetapanKind};
use penetapan_drafter::prompt::{build_aanmaning_prompt, build_generic_prompt, court_city, extraction_prompt, full_court_name};
use penetapan_drafter::{build_prompt, format_date, DocumentKind, FormRecord};

fn aanmaning_form() -> FormRecord {
    let mut form = FormRecord::default();
    form.determination_date = "2024-06-10".into();
    form.nomor_perkara = "1/Pdt.Eks/2024/PN Bdg".into();
    form.pemohon_eksekusi = "Budi Santoso".into();
    form.alamat_pemohon_eksekusi = "Jl. Merdeka 1, Bandung".into();
    form.termohon_eksekusi = "PT Contoh Jaya".into();
    form.alamat_termohon_eksekusi = "Jl. Asia Afrika 2, Bandung".into();
    form.nomor_putusan_pertama = "10/Pdt.G/2023/PN Bdg".into();
    form.tanggal_putusan_pertama = "2024-02-01".into();
    form.nomor_putusan_kasasi = "99 K/Pdt/2024".into();
    form.tanggal_putusan_kasasi = "2024-05-02".into();
    form.tanggal_surat = "2024-06-03".into();
    form
}

#[test]
fn dates_are_short_indonesian() {
    assert_eq!(format_date("2024-06-03"), "3/6/2024");
    assert_eq!(format_date("2024-12-25"), "25/12/2024");
    assert_eq!(format_date("3 Juni 2024"), "3 Juni 2024");
}

#[test]
fn court_names_are_derived() {
    assert_eq!(full_court_name("Pengadilan Negeri Bandung (PN Bdg)"), "Pengadilan Negeri Bandung");
    assert_eq!(full_court_name("Pengadilan Negeri Sumedang"), "Pengadilan Negeri Sumedang");
    assert_eq!(court_city("Pengadilan Negeri Bandung"), "Bandung");
}

#[test]
fn aanmaning_kind_selects_the_template() {
    let form = aanmaning_form();
    assert_eq!(build_prompt(&form), build_aanmaning_prompt(&form));

    let mut other = aanmaning_form();
    other.jenis_penetapan = Some(PenetapanKind::SitaEksekusi);
    assert_eq!(build_prompt(&other), build_generic_prompt(&other));
}

#[test]
fn aanmaning_template_carries_fixed_lines() {
    let prompt = build_aanmaning_prompt(&aanmaning_form());
    assert!(prompt.contains("PENGADILAN NEGERI BANDUNG\n\nPENETAPAN\n"));
    assert!(prompt.contains("Nomor 1/Pdt.Eks/2024/PN Bdg jo. Nomor 10/Pdt.G/2023/PN Bdg jo. Nomor 99 K/Pdt/2024\n"));
    assert!(prompt.contains("Budi Santoso, sebagai Pemohon Eksekusi;\nMELAWAN\nPT Contoh Jaya, sebagai Termohon Eksekusi;"));
    assert!(prompt.contains("di Jalan L.L.R.E. Martadinata No. 74-80 Bandung"));
    assert!(prompt.contains("DEMIKIANLAH, ditetapkan di Bandung pada tanggal 10/6/2024."));
    assert!(prompt.contains("KETUA PENGADILAN NEGERI BANDUNG\n"));
    assert!(prompt.contains("Wahyu Iman Santoso, S.H., M.H.\n"));
    assert!(prompt.contains("Redaksi[TAB]Rp.[TAB]10.000,-\n"));
    assert!(prompt.contains("Jumlah[TAB]Rp.[TAB]30.000,-\n"));
}

#[test]
fn aanmaning_reading_items_are_numbered_without_gaps() {
    let prompt = build_aanmaning_prompt(&aanmaning_form());
    assert!(prompt.contains("\n1. Surat Permohonan dari Budi Santoso, tanggal 3/6/2024"));
    assert!(prompt.contains("\n2. Putusan Pengadilan Negeri Bandung Nomor 10/Pdt.G/2023/PN Bdg tanggal 1/2/2024."));
    assert!(prompt.contains("\n3. Putusan Mahkamah Agung RI Nomor 99 K/Pdt/2024 tanggal 2/5/2024."));
    assert!(prompt.contains("\n4. Berkas Perkara Nomor 1/Pdt.Eks/2024/PN Bdg"));
    assert!(!prompt.contains("\n5. "));
}

#[test]
fn attorney_changes_summoned_party() {
    let mut form = aanmaning_form();
    let plain = build_aanmaning_prompt(&form);
    assert!(plain.contains("1) Budi Santoso, beralamat di Jl. Merdeka 1, Bandung, sebagai Pemohon Eksekusi;"));

    form.nama_kuasa = "AA Sutarsa, S.H.".into();
    let with_attorney = build_aanmaning_prompt(&form);
    assert!(with_attorney.contains("1) AA Sutarsa, S.H., beralamat di [Alamat Kuasa], selaku Kuasa dari Budi Santoso"));
    assert!(with_attorney.contains("Surat Permohonan dari AA Sutarsa, S.H., selaku kuasa dari Budi Santoso"));
}

#[test]
fn other_courts_get_generic_address() {
    let mut form = aanmaning_form();
    form.court_name = "Pengadilan Negeri Sumedang (PN Smd)".into();
    let prompt = build_aanmaning_prompt(&form);
    assert!(prompt.contains("di kantor Pengadilan Negeri Sumedang"));
    assert!(prompt.contains("PENGADILAN NEGERI SUMEDANG\n"));
}

#[test]
fn generic_prompt_omits_empty_fields() {
    let mut form = FormRecord::default();
    form.jenis_dokumen = DocumentKind::Surat;
    form.jenis_penetapan = None;
    form.nomor_perkara = "1/Pdt.Eks/2024/PN Bdg".into();
    let prompt = build_generic_prompt(&form);
    assert!(prompt.contains("- Nomor Perkara: 1/Pdt.Eks/2024/PN Bdg\n"));
    assert!(!prompt.contains("- Pemohon Eksekusi:"));
    assert!(!prompt.contains("- Nama Kuasa:"));
    assert!(!prompt.contains("RIWAYAT PERKARA"));
    assert!(prompt.contains("MEMBACA:\n[Tidak ada data yang dipilih]\n"));
    assert!(!prompt.contains("TEMBUSAN"));
}

#[test]
fn generic_history_follows_instance_order() {
    let mut form = aanmaning_form();
    form.jenis_penetapan = Some(PenetapanKind::Lelang);
    form.nomor_putusan_pk = "5 PK/Pdt/2024".into();
    form.nomor_putusan_banding = "20/PDT/2023/PT Bdg".into();
    let prompt = build_generic_prompt(&form);
    let first = prompt.find("Putusan Tingkat Pertama").unwrap();
    let appeal = prompt.find("Putusan Tingkat Banding").unwrap();
    let cassation = prompt.find("Putusan Tingkat Kasasi").unwrap();
    let review = prompt.find("Putusan Peninjauan Kembali").unwrap();
    assert!(first < appeal && appeal < cassation && cassation < review);
    assert!(prompt.contains("- Jenis Penetapan: Penetapan Lelang\n"));
}

#[test]
fn generic_reading_list_only_has_checked_items() {
    let mut form = aanmaning_form();
    form.jenis_penetapan = None;
    form.membaca.putusan_kasasi = true;
    form.membaca.berkas_perkara = true;
    let prompt = build_generic_prompt(&form);
    assert!(prompt.contains("MEMBACA:\n1. Putusan Kasasi Nomor 99 K/Pdt/2024 tanggal 2/5/2024.\n2. Berkas Perkara Nomor 1/Pdt.Eks/2024/PN Bdg.\n"));
}

#[test]
fn surat_lists_copies() {
    let mut form = FormRecord::default();
    form.jenis_dokumen = DocumentKind::Surat;
    form.tembusan = "Ketua Pengadilan Tinggi\n\nArsip".into();
    let prompt = build_generic_prompt(&form);
    assert!(prompt.contains("TEMBUSAN:\n- Ketua Pengadilan Tinggi\n- Arsip\n"));
}

#[test]
fn minutes_details_only_for_berita_acara() {
    let mut form = FormRecord::default();
    form.jenis_dokumen = DocumentKind::BeritaAcara;
    form.jenis_penetapan = None;
    form.jenis_berita_acara = Some(BeritaAcaraKind::Aanmaning);
    form.nama_saksi1 = "Asep".into();
    let prompt = build_generic_prompt(&form);
    assert!(prompt.contains("DETAIL BERITA ACARA:\n- Jurusita: Rahmat Hidayat, S.H.\n"));
    assert!(prompt.contains("- Saksi 1: Asep\n"));
    assert!(!prompt.contains("Waktu Sidang Berikutnya"));

    form.jenis_dokumen = DocumentKind::Penetapan;
    assert!(!build_generic_prompt(&form).contains("DETAIL BERITA ACARA"));
}

#[test]
fn extraction_prompt_asks_for_iso_dates() {
    assert!(extraction_prompt().contains("Pdt.Eks"));
    assert!(extraction_prompt().ends_with("YYYY-MM-DD."));
}

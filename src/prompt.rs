use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::form::{DocumentKind, FormRecord, Instance, PenetapanKind, DEFAULT_JUDGE};

const BANDUNG_COURT: &str = "Pengadilan Negeri Bandung";
const BANDUNG_ADDRESS: &str = "di Jalan L.L.R.E. Martadinata No. 74-80 Bandung";

static COURT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pengadilan negeri").unwrap());

/// `YYYY-MM-DD` → `d/m/yyyy`, the Indonesian short date. Anything else is
/// passed through untouched; empty stays empty.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%-d/%-m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Court name without the parenthesised abbreviation.
pub fn full_court_name(court_name: &str) -> &str {
    court_name.split('(').next().unwrap_or("").trim()
}

/// City part of "Pengadilan Negeri <city>", case-insensitive on the prefix.
pub fn court_city(full_court: &str) -> String {
    COURT_PREFIX_RE.replacen(full_court, 1, "").trim().to_string()
}

/// Instruction for the generator. The Aanmaning Penetapan gets the fixed
/// template; every other kind gets the generic field dump.
pub fn build_prompt(form: &FormRecord) -> String {
    if is_aanmaning(form) {
        build_aanmaning_prompt(form)
    } else {
        build_generic_prompt(form)
    }
}

pub fn is_aanmaning(form: &FormRecord) -> bool {
    form.jenis_dokumen == DocumentKind::Penetapan && form.jenis_penetapan == Some(PenetapanKind::Aanmaning)
}

fn instance_court(instance: Instance, full_court: &str) -> String {
    match instance {
        Instance::First => full_court.to_string(),
        Instance::Appeal => "Pengadilan Tinggi".to_string(),
        Instance::Cassation | Instance::Review => "Mahkamah Agung RI".to_string(),
    }
}

pub fn build_aanmaning_prompt(form: &FormRecord) -> String {
    let full_court = full_court_name(&form.court_name);
    let city = court_city(full_court);
    let judgments = form.judgments();
    let judgment_numbers: Vec<&str> = judgments.iter().map(|j| j.number.trim()).collect();

    let mut all_numbers: Vec<&str> = Vec::new();
    if !form.nomor_perkara.trim().is_empty() {
        all_numbers.push(form.nomor_perkara.trim());
    }
    all_numbers.extend(judgment_numbers.iter().copied());

    let full_number = all_numbers
        .iter()
        .enumerate()
        .map(|(i, n)| if i == 0 { format!("Nomor {n}") } else { format!("jo. Nomor {n}") })
        .collect::<Vec<_>>()
        .join(" ");

    let judgment_jo = if all_numbers.len() > 1 {
        format!("Nomor {}", all_numbers[1..].join(" jo. Nomor "))
    } else {
        format!("putusan {full_court} Nomor {}", form.nomor_putusan_pertama.trim())
    };

    let case_jo = if judgment_numbers.is_empty() {
        "[Belum ada nomor putusan yang diisi]".to_string()
    } else {
        format!("Nomor {}", judgment_numbers.join(" jo. Nomor "))
    };

    let has_attorney = !form.nama_kuasa.trim().is_empty();
    let applicant = if has_attorney {
        format!("{}, selaku kuasa dari {}", form.nama_kuasa, form.pemohon_eksekusi)
    } else {
        form.pemohon_eksekusi.clone()
    };
    let letter_number = if form.nomor_surat.trim().is_empty() {
        String::new()
    } else {
        format!(", Nomor {}", form.nomor_surat)
    };
    let request_letter = format!(
        "Surat Permohonan dari {applicant}, tanggal {}{letter_number}",
        format_date(&form.tanggal_surat)
    );

    let applicant_line = format!("{}, sebagai Pemohon Eksekusi;", form.pemohon_eksekusi);
    let respondent_line = format!("{}, sebagai Termohon Eksekusi;", form.termohon_eksekusi);

    let mut reading: Vec<String> = vec![format!(
        "{request_letter}, pada pokoknya mengajukan permohonan pelaksanaan isi putusan (eksekusi) perkara {case_jo}, dalam perkara antara:\n{applicant_line}\nMELAWAN\n{respondent_line}"
    )];
    for j in &judgments {
        reading.push(format!(
            "Putusan {} Nomor {} tanggal {}.",
            instance_court(j.instance, full_court),
            j.number.trim(),
            format_date(j.date)
        ));
    }
    if !form.nomor_perkara.trim().is_empty() {
        reading.push(format!(
            "Berkas Perkara {full_number}, dalam perkara antara: {} melawan {}.",
            form.pemohon_eksekusi, form.termohon_eksekusi
        ));
    }
    let reading_section = reading
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let first_party = if has_attorney {
        format!(
            "1) {}, beralamat di {}, selaku Kuasa dari {}, beralamat di {}, berdasarkan Surat Kuasa tanggal {}, sebagai Pemohon Eksekusi;",
            form.nama_kuasa,
            or_placeholder(&form.alamat_kuasa, "[Alamat Kuasa]"),
            form.pemohon_eksekusi,
            form.alamat_pemohon_eksekusi,
            or_placeholder(&format_date(&form.tanggal_surat_kuasa), "[Tanggal Surat Kuasa]"),
        )
    } else {
        format!(
            "1) {}, beralamat di {}, sebagai Pemohon Eksekusi;",
            form.pemohon_eksekusi, form.alamat_pemohon_eksekusi
        )
    };
    let second_party = format!(
        "2) {}, beralamat di {}, sebagai Termohon Eksekusi;",
        form.termohon_eksekusi, form.alamat_termohon_eksekusi
    );

    let court_address = if full_court == BANDUNG_COURT {
        BANDUNG_ADDRESS.to_string()
    } else {
        format!("di kantor {full_court}")
    };
    let judge = or_placeholder(&form.judge_name, DEFAULT_JUDGE);
    let letter_date = format_date(&form.tanggal_surat);
    let determination_date = format_date(&form.determination_date);

    let mut out = String::new();
    out.push_str("INSTRUKSI UTAMA:\n");
    out.push_str("Anda adalah asisten ahli hukum yang bertugas membuat draf \"Penetapan Aanmaning\" untuk Pengadilan di Indonesia.\n");
    out.push_str("Gunakan template dan data berikut untuk menghasilkan dokumen yang lengkap, formal, dan akurat.\n");
    out.push_str("JANGAN mengubah struktur atau frasa baku dari template. Isi bagian yang memerlukan elaborasi (MENIMBANG dan Memperhatikan) secara cerdas dan profesional berdasarkan data yang diberikan.\n\n");

    out.push_str("DATA SUMBER UNTUK ANALISIS:\n");
    out.push_str(&format!("- Jenis Perkara: {}\n", form.jenis_perkara));
    out.push_str(&format!("- Amar Putusan Tingkat Pertama: {}\n", or_placeholder(&form.amar_putusan_pertama, "[Tidak diisi]")));
    out.push_str(&format!("- Amar Putusan Banding: {}\n", or_placeholder(&form.amar_putusan_banding, "[Tidak Ada]")));
    out.push_str(&format!("- Amar Putusan Kasasi: {}\n", or_placeholder(&form.amar_putusan_kasasi, "[Tidak Ada]")));
    out.push_str(&format!("- Amar Putusan PK: {}\n\n", or_placeholder(&form.amar_putusan_pk, "[Tidak Ada]")));

    out.push_str("--- TEMPLATE DOKUMEN YANG HARUS DIIKUTI ---\n");
    out.push_str(&format!("PENGADILAN NEGERI {}\n\n", city.to_uppercase()));
    out.push_str("PENETAPAN\n");
    out.push_str(&format!("{full_number}\n\n"));
    out.push_str("DEMI KEADILAN BERDASARKAN KETUHANAN YANG MAHA ESA\n\n");
    out.push_str(&format!("Kami, Ketua {full_court};\n\n"));
    out.push_str("SETELAH MEMBACA:\n");
    out.push_str(&reading_section);
    out.push_str("\n\n");

    out.push_str("MENIMBANG:\n");
    out.push_str("[INSTRUKSI UNTUK AI: Lakukan analisis hukum yang mendalam untuk menyusun pertimbangan hukum.\n");
    out.push_str("1. **Analisis Fakta:** Mulai dengan menyatakan bahwa Pemohon Eksekusi telah mengajukan permohonan eksekusi terhadap putusan yang telah berkekuatan hukum tetap (inkracht van gewijsde), mengingat Termohon Eksekusi tidak melaksanakannya secara sukarela. Ringkas amar putusan dari semua tingkatan (Pertama, Banding, Kasasi, PK) yang relevan.\n");
    out.push_str("2. **Analisis Hukum:** Lakukan analisis yuridis yang komprehensif dengan merujuk pada sumber-sumber hukum berikut:\n");
    out.push_str(&format!("   * **Peraturan Perundang-undangan:** Identifikasi dan sebutkan pasal-pasal yang paling relevan, terutama dari Herzien Inlandsch Reglement (HIR) atau Reglement Buiten de Gewesten (RBG) yang mengatur tentang pelaksanaan putusan (misalnya Pasal 196 HIR). Sesuaikan dengan **Jenis Perkara** ({}) jika ada undang-undang spesifik yang berlaku (misalnya UU Hak Tanggungan).\n", form.jenis_perkara));
    out.push_str("   * **Peraturan & Surat Edaran Mahkamah Agung (PERMA & SEMA):** Jika ada, rujuk pada PERMA atau SEMA yang relevan dengan proses eksekusi atau aanmaning.\n");
    out.push_str("   * **Asas dan Prinsip Hukum:** Jelaskan bagaimana permohonan ini sejalan dengan asas-asas hukum acara perdata, seperti asas bahwa putusan hakim harus dilaksanakan dan asas kepastian hukum.\n");
    out.push_str("   * **Yurisprudensi dan Doktrin:** Jika memungkinkan, sebutkan yurisprudensi atau pendapat ahli (doktrin) yang memperkuat argumen bahwa aanmaning adalah langkah yang tepat dan perlu sebelum eksekusi paksa.\n");
    out.push_str("3. **Kesimpulan Pertimbangan:** Simpulkan bahwa berdasarkan analisis fakta dan hukum di atas, permohonan Pemohon Eksekusi telah memenuhi syarat formil dan materiil, beralasan menurut hukum, dan oleh karena itu patut untuk dikabulkan dengan terlebih dahulu memanggil Termohon Eksekusi untuk diberikan teguran (aanmaning).]\n\n");

    out.push_str("Memperhatikan:\n");
    out.push_str("[INSTRUKSI UNTUK AI: Sebutkan secara spesifik dasar hukum utama yang menjadi landasan penetapan ini, seperti Pasal 196 Herzien Inlandsch Reglement (H.I.R) dan peraturan perundang-undangan lain yang relevan hasil dari analisis di bagian MENIMBANG.]\n\n");

    out.push_str("MENETAPKAN:\n");
    out.push_str("- Mengabulkan permohonan Pemohon Eksekusi tersebut;\n");
    out.push_str(&format!("- Memerintahkan Panitera {full_court} untuk menunjuk salah seorang Jurusita/Jurusita Pengganti pada Pengadilan Negeri tersebut yang dinilai cakap guna melaksanakan panggilan kepada:\n"));
    out.push_str(&format!("{first_party}\n{second_party}\n"));
    out.push_str(&format!("Supaya ia/mereka datang menghadap Ketua {full_court}, {court_address}, pada:\n"));
    out.push_str("HARI: ________, TANGGAL: ______________________, JAM: ______ WIB\n");
    out.push_str(&format!("- Bagi Pemohon Eksekusi sehubungan permohonannya tertanggal {letter_date}, yang diterima di Kepaniteraan {full_court} dengan Register Nomor {};\n", form.nomor_perkara));
    out.push_str(&format!("- Bagi Termohon Eksekusi guna ditegur agar dalam tenggang waktu 8 (delapan) hari setelah ditegur untuk segera melaksanakan putusan {judgment_jo};\n"));
    out.push_str("- Menyatakan bahwa mengenai biaya yang timbul sebagai akibat permohonan ini dibebankan kepada Pemohon Eksekusi;\n\n");

    out.push_str(&format!("DEMIKIANLAH, ditetapkan di {city} pada tanggal {determination_date}.\n\n\n\n"));
    out.push_str(&format!("KETUA {}\n\n\n\n\n\n", full_court.to_uppercase()));
    out.push_str(&format!("{judge}\n\n\n"));
    out.push_str("Perincian Biaya:\n");
    out.push_str("Redaksi[TAB]Rp.[TAB]10.000,-\n");
    out.push_str("Materai[TAB]Rp.[TAB]10.000,-\n");
    out.push_str("Pencatatan[TAB]Rp.[TAB]10.000,-\n");
    out.push_str("Jumlah[TAB]Rp.[TAB]30.000,-\n");
    out.push_str("--- END OF TEMPLATE ---\n\n");
    out.push_str("HASILKAN DOKUMEN FINAL SECARA LENGKAP HANYA BERDASARKAN TEMPLATE DI ATAS. JANGAN TAMBAHKAN TEKS APAPUN DI LUAR TEMPLATE.\n");
    out
}

fn push_line(out: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        out.push_str(&format!("- {label}: {value}\n"));
    }
}

fn reading_items(form: &FormRecord) -> Vec<String> {
    let m = &form.membaca;
    let mut items = Vec::new();
    if m.surat_permohonan {
        let via = if form.nama_kuasa.trim().is_empty() {
            String::new()
        } else {
            format!(" melalui kuasanya {}", form.nama_kuasa)
        };
        let number = if form.nomor_surat.trim().is_empty() {
            String::new()
        } else {
            format!(" Nomor {}", form.nomor_surat)
        };
        items.push(format!(
            "Surat Permohonan dari {}{via}, tanggal {}{number}.",
            form.pemohon_eksekusi,
            format_date(&form.tanggal_surat)
        ));
    }
    for j in form.judgments() {
        let (checked, label) = match j.instance {
            Instance::First => (m.putusan_pertama, "Putusan"),
            Instance::Appeal => (m.putusan_banding, "Putusan Banding"),
            Instance::Cassation => (m.putusan_kasasi, "Putusan Kasasi"),
            Instance::Review => (m.putusan_pk, "Putusan Peninjauan Kembali"),
        };
        if checked {
            items.push(format!("{label} Nomor {} tanggal {}.", j.number, format_date(j.date)));
        }
    }
    if m.berkas_perkara && !form.nomor_perkara.trim().is_empty() {
        items.push(format!("Berkas Perkara Nomor {}.", form.nomor_perkara));
    }
    items
}

fn history_section(form: &FormRecord) -> String {
    let mut out = String::new();
    for j in form.judgments() {
        let title = match j.instance {
            Instance::First => "Putusan Tingkat Pertama",
            Instance::Appeal => "Putusan Tingkat Banding",
            Instance::Cassation => "Putusan Tingkat Kasasi",
            Instance::Review => "Putusan Peninjauan Kembali",
        };
        out.push_str(&format!(
            "- {title}:\n  - Nomor: {}\n  - Tanggal: {}\n  - Amar: {}\n",
            j.number,
            format_date(j.date),
            or_placeholder(j.disposition, "[Tidak diisi]")
        ));
    }
    out
}

fn minutes_section(form: &FormRecord) -> String {
    let mut out = String::new();
    push_line(&mut out, "Jurusita", &form.nama_jurusita);
    push_line(&mut out, "Pihak yang Hadir", &form.pihak_hadir);
    push_line(&mut out, "Isi Berita Acara", &form.isi_berita_acara);
    push_line(&mut out, "Saksi 1", &form.nama_saksi1);
    push_line(&mut out, "Saksi 2", &form.nama_saksi2);
    push_line(&mut out, "Tanggal Sidang Berikutnya", &format_date(&form.tanggal_sidang_berikutnya));
    if !form.tanggal_sidang_berikutnya.trim().is_empty() {
        push_line(&mut out, "Waktu Sidang Berikutnya", &form.waktu_sidang_berikutnya);
    }
    out
}

pub fn build_generic_prompt(form: &FormRecord) -> String {
    let kind = form.jenis_dokumen.label();
    let mut out = String::new();
    out.push_str(&format!(
        "Buatlah draf dokumen hukum resmi Indonesia dengan jenis \"{kind}\" berdasarkan informasi berikut.\n"
    ));
    out.push_str("Gunakan Bahasa Indonesia yang baku, formal, dan sesuai dengan standar tata naskah dinas di lingkungan peradilan.\n\n");

    out.push_str("INFORMASI UTAMA:\n");
    out.push_str(&format!("- Jenis Dokumen: {kind}\n"));
    match form.jenis_dokumen {
        DocumentKind::Penetapan => {
            if let Some(sub) = form.jenis_penetapan {
                push_line(&mut out, "Jenis Penetapan", sub.label());
            }
        }
        DocumentKind::BeritaAcara => {
            if let Some(sub) = form.jenis_berita_acara {
                push_line(&mut out, "Jenis Berita Acara", sub.label());
            }
        }
        DocumentKind::Surat => {}
    }
    push_line(&mut out, "Nama Pengadilan", &form.court_name);
    push_line(&mut out, "Jenis Perkara", &form.jenis_perkara);
    push_line(&mut out, "Nomor Perkara", &form.nomor_perkara);
    push_line(&mut out, "Tanggal Dokumen", &format_date(&form.determination_date));
    push_line(&mut out, "Hakim Tunggal", &form.judge_name);
    push_line(&mut out, "Panitera Pengganti", &form.clerk_name);
    out.push_str(&format!("- Permohonan Prodeo: {}\n\n", if form.is_prodeo { "Ya" } else { "Tidak" }));

    out.push_str("PARA PIHAK:\n");
    push_line(&mut out, "Pemohon Eksekusi", &form.pemohon_eksekusi);
    push_line(&mut out, "Alamat Pemohon Eksekusi", &form.alamat_pemohon_eksekusi);
    push_line(&mut out, "Termohon Eksekusi", &form.termohon_eksekusi);
    push_line(&mut out, "Alamat Termohon Eksekusi", &form.alamat_termohon_eksekusi);
    out.push('\n');

    out.push_str("DETAIL PERMOHONAN:\n");
    out.push_str(&format!("- Nomor Surat Permohonan: {}\n", or_placeholder(&form.nomor_surat, "[Tidak diisi]")));
    push_line(&mut out, "Tanggal Surat Permohonan", &format_date(&form.tanggal_surat));
    push_line(&mut out, "Nama Kuasa", &form.nama_kuasa);
    push_line(&mut out, "Alamat Kuasa", &form.alamat_kuasa);
    push_line(&mut out, "Tanggal Surat Kuasa", &format_date(&form.tanggal_surat_kuasa));
    out.push('\n');

    let history = history_section(form);
    if !history.is_empty() {
        out.push_str("RIWAYAT PERKARA:\n");
        out.push_str(&history);
        out.push('\n');
    }

    if form.jenis_dokumen == DocumentKind::BeritaAcara {
        let minutes = minutes_section(form);
        if !minutes.is_empty() {
            out.push_str("DETAIL BERITA ACARA:\n");
            out.push_str(&minutes);
            out.push('\n');
        }
    }

    out.push_str("SUBSTANSI DOKUMEN:\n\n");
    let reading = reading_items(form);
    out.push_str("MEMBACA:\n");
    if reading.is_empty() {
        out.push_str("[Tidak ada data yang dipilih]\n");
    } else {
        for (i, item) in reading.iter().enumerate() {
            out.push_str(&format!("{}. {item}\n", i + 1));
        }
    }
    out.push('\n');

    out.push_str("MENIMBANG:\n");
    out.push_str(or_placeholder(
        &form.menimbang,
        "[Jelaskan pertimbangan hukum berdasarkan fakta dan hukum yang relevan, termasuk riwayat perkara di atas]",
    ));
    out.push_str("\n\nMENGINGAT:\n");
    out.push_str(or_placeholder(
        &form.mengingat,
        "[Sebutkan pasal-pasal dari peraturan perundang-undangan yang menjadi dasar]",
    ));
    out.push_str("\n\nMENETAPKAN:\n");
    out.push_str(or_placeholder(&form.menetapkan, "[Tuliskan amar putusan secara jelas dan terperinci]"));
    out.push_str("\n\n");

    if form.jenis_dokumen == DocumentKind::Surat && !form.tembusan.trim().is_empty() {
        out.push_str("TEMBUSAN:\n");
        for copy in form.tembusan.lines().map(str::trim).filter(|t| !t.is_empty()) {
            out.push_str(&format!("- {copy}\n"));
        }
        out.push('\n');
    }

    out.push_str("INSTRUKSI:\n");
    out.push_str(&format!("1. Susun informasi di atas menjadi sebuah dokumen {kind} yang lengkap dan koheren.\n"));
    out.push_str("2. Jika jenis penetapan atau berita acara spesifik (misal: Berita Acara Aanmaning), sesuaikan judul dan isi dokumen agar relevan.\n");
    out.push_str("3. Pastikan semua bagian (kop, judul, identitas, isi, penutup) tersusun dengan benar.\n");
    out.push_str("4. Untuk Penetapan, sertakan frasa \"DEMI KEADILAN BERDASARKAN KETUHANAN YANG MAHA ESA\".\n");
    out.push_str("5. Hasilkan teks lengkap untuk dokumen final.\n");
    out
}

/// Instruction sent alongside the page image when extracting form fields.
pub fn extraction_prompt() -> &'static str {
    concat!(
        "Anda adalah asisten hukum ahli. Analisis gambar dokumen hukum ini dan ekstrak semua field yang relevan. Pastikan Anda mengikuti aturan-aturan penting berikut:\n",
        "1.  **Nomor Perkara Eksekusi ('nomorPerkara'):** Identifikasi dan ekstrak nomor perkara yang secara spesifik mengandung 'Pdt.Eks'.\n",
        "2.  **Tanggal Surat Permohonan ('tanggalSurat'):** Cari frasa seperti 'Surat permohonan tanggal ...' dan ekstrak tanggal lengkapnya. Contohnya, dari 'Surat permohonan tanggal 24 Juni 2024', Anda harus mengekstrak tanggal '24 Juni 2024'.\n",
        "3.  **Nama dan Alamat Kuasa ('namaKuasa', 'alamatKuasa'):** Cari frasa yang cocok dengan pola 'yang diajukan oleh: [Nama Kuasa], beralamat di [Alamat Kuasa], selaku kuasa ...'. Ekstrak nama dan alamat lengkap dari pola ini.\n",
        "4.  **Tanggal Surat Kuasa ('tanggalSuratKuasa'):** Cari frasa yang cocok dengan pola 'berdasarkan Surat Kuasa tanggal ...'. Ekstrak tanggal lengkap dari pola ini.\n",
        "Jika ada informasi yang tidak dapat ditemukan, kembalikan string kosong untuk field tersebut.\n",
        "Untuk semua tanggal yang diekstrak, format hasilnya menjadi YYYY-MM-DD."
    )
}

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to read form: {0}")]
    Read(String),
    #[error("Failed to parse form: {0}")]
    Parse(String),
    #[error("Failed to write form: {0}")]
    Write(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:tt),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == s.trim())
                    .ok_or_else(|| s.to_string())
            }
        }
    };
}

labelled_enum!(DocumentKind {
    Surat => "Surat",
    Penetapan => "Penetapan",
    BeritaAcara => "Berita Acara",
});

labelled_enum!(PenetapanKind {
    Aanmaning => "Penetapan Aanmaning",
    SitaEksekusi => "Penetapan Sita Eksekusi",
    PemblokiranRekening => "Penetapan Pemblokiran Rekening",
    PengosonganPenyerahan => "Penetapan Eksekusi Pengosongan dan Penyerahan",
    Lelang => "Penetapan Lelang",
});

labelled_enum!(BeritaAcaraKind {
    Aanmaning => "Berita Acara Aanmaning",
    SitaEksekusi => "Berita Acara Sita Eksekusi",
    PemblokiranRekening => "Berita Acara Pemblokiran Rekening",
    PengosonganPenyerahan => "Berita Acara Eksekusi Pengosongan dan Penyerahan",
    Lelang => "Berita Acara Lelang",
});

labelled_enum!(ReadingItem {
    SuratPermohonan => "suratPermohonan",
    PutusanPertama => "putusanPertama",
    PutusanBanding => "putusanBanding",
    PutusanKasasi => "putusanKasasi",
    PutusanPk => "putusanPK",
    BerkasPerkara => "berkasPerkara",
});

/// Court instance of a judgment, in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Instance {
    First,
    Appeal,
    Cassation,
    Review,
}

impl Instance {
    pub const ORDERED: [Instance; 4] = [Instance::First, Instance::Appeal, Instance::Cassation, Instance::Review];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment<'a> {
    pub instance: Instance,
    pub number: &'a str,
    pub date: &'a str,
    pub disposition: &'a str,
}

/// Which background documents were read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingOptions {
    pub surat_permohonan: bool,
    pub putusan_pertama: bool,
    pub putusan_banding: bool,
    pub putusan_kasasi: bool,
    #[serde(rename = "putusanPK")]
    pub putusan_pk: bool,
    pub berkas_perkara: bool,
}

impl ReadingOptions {
    pub fn get(&self, item: ReadingItem) -> bool {
        match item {
            ReadingItem::SuratPermohonan => self.surat_permohonan,
            ReadingItem::PutusanPertama => self.putusan_pertama,
            ReadingItem::PutusanBanding => self.putusan_banding,
            ReadingItem::PutusanKasasi => self.putusan_kasasi,
            ReadingItem::PutusanPk => self.putusan_pk,
            ReadingItem::BerkasPerkara => self.berkas_perkara,
        }
    }

    pub fn set(&mut self, item: ReadingItem, checked: bool) {
        let slot = match item {
            ReadingItem::SuratPermohonan => &mut self.surat_permohonan,
            ReadingItem::PutusanPertama => &mut self.putusan_pertama,
            ReadingItem::PutusanBanding => &mut self.putusan_banding,
            ReadingItem::PutusanKasasi => &mut self.putusan_kasasi,
            ReadingItem::PutusanPk => &mut self.putusan_pk,
            ReadingItem::BerkasPerkara => &mut self.berkas_perkara,
        };
        *slot = checked;
    }
}

fn empty_as_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|v| serde::de::Error::custom(format!("unknown kind: {v}"))),
    }
}

/// Everything the user supplies about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRecord {
    pub jenis_dokumen: DocumentKind,
    #[serde(deserialize_with = "empty_as_none")]
    pub jenis_penetapan: Option<PenetapanKind>,
    #[serde(deserialize_with = "empty_as_none")]
    pub jenis_berita_acara: Option<BeritaAcaraKind>,

    pub court_name: String,
    pub determination_date: String,
    pub judge_name: String,
    pub clerk_name: String,

    pub jenis_perkara: String,
    pub nomor_perkara: String,
    pub pemohon_eksekusi: String,
    pub alamat_pemohon_eksekusi: String,
    pub termohon_eksekusi: String,
    pub alamat_termohon_eksekusi: String,
    pub nomor_putusan_pertama: String,
    pub tanggal_putusan_pertama: String,
    pub amar_putusan_pertama: String,
    pub nomor_putusan_banding: String,
    pub tanggal_putusan_banding: String,
    pub amar_putusan_banding: String,
    pub nomor_putusan_kasasi: String,
    pub tanggal_putusan_kasasi: String,
    pub amar_putusan_kasasi: String,
    #[serde(rename = "nomorPutusanPK")]
    pub nomor_putusan_pk: String,
    #[serde(rename = "tanggalPutusanPK")]
    pub tanggal_putusan_pk: String,
    #[serde(rename = "amarPutusanPK")]
    pub amar_putusan_pk: String,

    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub nama_kuasa: String,
    pub alamat_kuasa: String,
    pub tanggal_surat_kuasa: String,

    pub membaca: ReadingOptions,
    pub menimbang: String,
    pub mengingat: String,
    pub menetapkan: String,
    pub tembusan: String,

    pub nama_jurusita: String,
    pub pihak_hadir: String,
    pub isi_berita_acara: String,
    pub nama_saksi1: String,
    pub nama_saksi2: String,
    pub tanggal_sidang_berikutnya: String,
    pub waktu_sidang_berikutnya: String,

    pub is_prodeo: bool,
}

pub const DEFAULT_COURT: &str = "Pengadilan Negeri Bandung (PN Bdg)";
pub const DEFAULT_JUDGE: &str = "Wahyu Iman Santoso, S.H., M.H.";
pub const DEFAULT_CLERK: &str = "Nurhayani Butar Butar, S.H.";
pub const DEFAULT_BAILIFF: &str = "Rahmat Hidayat, S.H.";
pub const DEFAULT_CASE_TYPE: &str = "Putusan Perdata Umum (Pdt.Eks)";

impl Default for FormRecord {
    fn default() -> Self {
        FormRecord {
            jenis_dokumen: DocumentKind::Penetapan,
            jenis_penetapan: Some(PenetapanKind::Aanmaning),
            jenis_berita_acara: None,
            court_name: DEFAULT_COURT.to_string(),
            determination_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            judge_name: DEFAULT_JUDGE.to_string(),
            clerk_name: DEFAULT_CLERK.to_string(),
            jenis_perkara: DEFAULT_CASE_TYPE.to_string(),
            nomor_perkara: String::new(),
            pemohon_eksekusi: String::new(),
            alamat_pemohon_eksekusi: String::new(),
            termohon_eksekusi: String::new(),
            alamat_termohon_eksekusi: String::new(),
            nomor_putusan_pertama: String::new(),
            tanggal_putusan_pertama: String::new(),
            amar_putusan_pertama: String::new(),
            nomor_putusan_banding: String::new(),
            tanggal_putusan_banding: String::new(),
            amar_putusan_banding: String::new(),
            nomor_putusan_kasasi: String::new(),
            tanggal_putusan_kasasi: String::new(),
            amar_putusan_kasasi: String::new(),
            nomor_putusan_pk: String::new(),
            tanggal_putusan_pk: String::new(),
            amar_putusan_pk: String::new(),
            nomor_surat: String::new(),
            tanggal_surat: String::new(),
            nama_kuasa: String::new(),
            alamat_kuasa: String::new(),
            tanggal_surat_kuasa: String::new(),
            membaca: ReadingOptions::default(),
            menimbang: String::new(),
            mengingat: String::new(),
            menetapkan: String::new(),
            tembusan: String::new(),
            nama_jurusita: DEFAULT_BAILIFF.to_string(),
            pihak_hadir: String::new(),
            isi_berita_acara: String::new(),
            nama_saksi1: String::new(),
            nama_saksi2: String::new(),
            tanggal_sidang_berikutnya: String::new(),
            waktu_sidang_berikutnya: "10:00".to_string(),
            is_prodeo: false,
        }
    }
}

/// Keys the extraction service may fill. Anything else in its answer is dropped.
pub const EXTRACTION_FIELDS: [&str; 22] = [
    "nomorPerkara",
    "pemohonEksekusi",
    "alamatPemohonEksekusi",
    "termohonEksekusi",
    "alamatTermohonEksekusi",
    "nomorPutusanPertama",
    "tanggalPutusanPertama",
    "amarPutusanPertama",
    "nomorPutusanBanding",
    "tanggalPutusanBanding",
    "amarPutusanBanding",
    "nomorPutusanKasasi",
    "tanggalPutusanKasasi",
    "amarPutusanKasasi",
    "nomorPutusanPK",
    "tanggalPutusanPK",
    "amarPutusanPK",
    "nomorSurat",
    "tanggalSurat",
    "namaKuasa",
    "alamatKuasa",
    "tanggalSuratKuasa",
];

/// Field name → value, as returned by the extraction service.
pub type PartialRecord = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
}

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormUpdate {
    Text { field: String, value: String },
    Reading { item: ReadingItem, checked: bool },
    Prodeo(bool),
    DocumentKind(DocumentKind),
    PenetapanKind(Option<PenetapanKind>),
    BeritaAcaraKind(Option<BeritaAcaraKind>),
}

fn parse_bool(field: &str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "ya" | "yes" | "on" => Ok(true),
        "false" | "0" | "tidak" | "no" | "off" | "" => Ok(false),
        _ => Err(FormError::InvalidValue { field: field.into(), value: value.into() }),
    }
}

fn parse_kind<T: FromStr<Err = String>>(field: &str, value: &str) -> Result<Option<T>, FormError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FormError::InvalidValue { field: field.into(), value: value.into() })
}

impl FormUpdate {
    /// Resolve a `key=value` edit the way the form widgets would.
    pub fn parse(key: &str, value: &str) -> Result<FormUpdate, FormError> {
        let key = key.trim();
        if let Ok(item) = key.parse::<ReadingItem>() {
            return Ok(FormUpdate::Reading { item, checked: parse_bool(key, value)? });
        }
        match key {
            "isProdeo" => Ok(FormUpdate::Prodeo(parse_bool(key, value)?)),
            "jenisDokumen" => value
                .parse()
                .map(FormUpdate::DocumentKind)
                .map_err(|_| FormError::InvalidValue { field: key.into(), value: value.into() }),
            "jenisPenetapan" => Ok(FormUpdate::PenetapanKind(parse_kind(key, value)?)),
            "jenisBeritaAcara" => Ok(FormUpdate::BeritaAcaraKind(parse_kind(key, value)?)),
            _ if TEXT_FIELDS.contains(&key) => {
                Ok(FormUpdate::Text { field: key.to_string(), value: value.to_string() })
            }
            _ => Err(FormError::UnknownField(key.to_string())),
        }
    }
}

// Form keys of the free-text fields, mapped onto the record.
macro_rules! text_fields {
    ($($key:literal => $field:ident),+ $(,)?) => {
        pub const TEXT_FIELDS: &[&str] = &[$($key),+];

        impl FormRecord {
            /// Read a free-text field by its form key.
            pub fn text_field(&self, key: &str) -> Option<&str> {
                match key {
                    $($key => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }

            fn text_field_mut(&mut self, key: &str) -> Option<&mut String> {
                match key {
                    $($key => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

text_fields! {
    "courtName" => court_name,
    "determinationDate" => determination_date,
    "judgeName" => judge_name,
    "clerkName" => clerk_name,
    "jenisPerkara" => jenis_perkara,
    "nomorPerkara" => nomor_perkara,
    "pemohonEksekusi" => pemohon_eksekusi,
    "alamatPemohonEksekusi" => alamat_pemohon_eksekusi,
    "termohonEksekusi" => termohon_eksekusi,
    "alamatTermohonEksekusi" => alamat_termohon_eksekusi,
    "nomorPutusanPertama" => nomor_putusan_pertama,
    "tanggalPutusanPertama" => tanggal_putusan_pertama,
    "amarPutusanPertama" => amar_putusan_pertama,
    "nomorPutusanBanding" => nomor_putusan_banding,
    "tanggalPutusanBanding" => tanggal_putusan_banding,
    "amarPutusanBanding" => amar_putusan_banding,
    "nomorPutusanKasasi" => nomor_putusan_kasasi,
    "tanggalPutusanKasasi" => tanggal_putusan_kasasi,
    "amarPutusanKasasi" => amar_putusan_kasasi,
    "nomorPutusanPK" => nomor_putusan_pk,
    "tanggalPutusanPK" => tanggal_putusan_pk,
    "amarPutusanPK" => amar_putusan_pk,
    "nomorSurat" => nomor_surat,
    "tanggalSurat" => tanggal_surat,
    "namaKuasa" => nama_kuasa,
    "alamatKuasa" => alamat_kuasa,
    "tanggalSuratKuasa" => tanggal_surat_kuasa,
    "menimbang" => menimbang,
    "mengingat" => mengingat,
    "menetapkan" => menetapkan,
    "tembusan" => tembusan,
    "namaJurusita" => nama_jurusita,
    "pihakHadir" => pihak_hadir,
    "isiBeritaAcara" => isi_berita_acara,
    "namaSaksi1" => nama_saksi1,
    "namaSaksi2" => nama_saksi2,
    "tanggalSidangBerikutnya" => tanggal_sidang_berikutnya,
    "waktuSidangBerikutnya" => waktu_sidang_berikutnya,
}

impl FormRecord {
    /// Apply one edit. An unknown field leaves the record untouched.
    pub fn apply(&mut self, update: FormUpdate) -> Result<(), FormError> {
        match update {
            FormUpdate::Text { field, value } => {
                let slot = self.text_field_mut(&field).ok_or(FormError::UnknownField(field))?;
                *slot = value;
            }
            FormUpdate::Reading { item, checked } => self.membaca.set(item, checked),
            FormUpdate::Prodeo(on) => self.is_prodeo = on,
            FormUpdate::DocumentKind(kind) => {
                self.jenis_dokumen = kind;
                self.jenis_penetapan = (kind == DocumentKind::Penetapan).then_some(PenetapanKind::Aanmaning);
                self.jenis_berita_acara =
                    (kind == DocumentKind::BeritaAcara).then_some(BeritaAcaraKind::Aanmaning);
            }
            FormUpdate::PenetapanKind(kind) => self.jenis_penetapan = kind,
            FormUpdate::BeritaAcaraKind(kind) => self.jenis_berita_acara = kind,
        }
        Ok(())
    }

    /// Overwrite the fields present in an extraction result; leave the rest.
    pub fn merge_extracted(&mut self, partial: &PartialRecord) -> MergeReport {
        let mut report = MergeReport::default();
        for (key, value) in partial {
            let slot = if EXTRACTION_FIELDS.contains(&key.as_str()) { self.text_field_mut(key) } else { None };
            match slot {
                Some(slot) => {
                    *slot = value.clone();
                    report.applied.push(key.clone());
                }
                None => report.ignored.push(key.clone()),
            }
        }
        report
    }

    pub fn judgment(&self, instance: Instance) -> Judgment<'_> {
        let (number, date, disposition) = match instance {
            Instance::First => (&self.nomor_putusan_pertama, &self.tanggal_putusan_pertama, &self.amar_putusan_pertama),
            Instance::Appeal => (&self.nomor_putusan_banding, &self.tanggal_putusan_banding, &self.amar_putusan_banding),
            Instance::Cassation => (&self.nomor_putusan_kasasi, &self.tanggal_putusan_kasasi, &self.amar_putusan_kasasi),
            Instance::Review => (&self.nomor_putusan_pk, &self.tanggal_putusan_pk, &self.amar_putusan_pk),
        };
        Judgment { instance, number, date, disposition }
    }

    /// Judgments that carry a number, first instance first.
    pub fn judgments(&self) -> Vec<Judgment<'_>> {
        Instance::ORDERED
            .iter()
            .map(|i| self.judgment(*i))
            .filter(|j| !j.number.trim().is_empty())
            .collect()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("json")).unwrap_or(false)
}

/// Load a form from YAML, or JSON when the file ends in `.json`.
pub fn load_form(path: &Path) -> Result<FormRecord, FormError> {
    let raw = std::fs::read_to_string(path).map_err(|e| FormError::Read(e.to_string()))?;
    if is_json(path) {
        serde_json::from_str(&raw).map_err(|e| FormError::Parse(e.to_string()))
    } else {
        serde_yaml::from_str(&raw).map_err(|e| FormError::Parse(e.to_string()))
    }
}

pub fn save_form(form: &FormRecord, path: &Path) -> Result<(), FormError> {
    let body = if is_json(path) {
        serde_json::to_string_pretty(form).map_err(|e| FormError::Write(e.to_string()))?
    } else {
        serde_yaml::to_string(form).map_err(|e| FormError::Write(e.to_string()))?
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| FormError::Write(e.to_string()))?;
    }
    std::fs::write(path, body).map_err(|e| FormError::Write(e.to_string()))
}

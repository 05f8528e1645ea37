//! The upload workbook layout: five required sheets with fixed Indonesian
//! headers. Validation, ingestion and the template all read from here.

/// One column: its exact header and the template's example value.
#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub header:  &'static str,
  pub example: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
  pub name:    &'static str,
  pub columns: &'static [Column],
}

impl SheetSchema {
  pub fn headers(&self) -> impl Iterator<Item = &'static str> {
    self.columns.iter().map(|c| c.header)
  }
}

const fn col(header: &'static str, example: &'static str) -> Column {
  Column { header, example }
}

// ─── Headers ─────────────────────────────────────────────────────────────────

pub const LOCAL_ID: &str = "ID Karyawan";
pub const FULL_NAME: &str = "Nama Lengkap";
pub const EMAIL: &str = "Email";
pub const BIRTH_DATE: &str = "Tanggal Lahir";
pub const POSITION: &str = "Posisi";
pub const DEPARTMENT: &str = "Departemen";
pub const LEVEL: &str = "Level";
pub const JOB_FAMILY: &str = "Rumpun Jabatan";
pub const TALENT_MOBILITY: &str = "Talent Mobility";
pub const COMPANY_ID: &str = "ID Perusahaan";

pub const EDUCATION_LEVEL: &str = "Jenjang Pendidikan";
pub const INSTITUTION: &str = "Nama Institusi";
pub const MAJOR: &str = "Jurusan";
pub const ENTRY_YEAR: &str = "Tahun Masuk";
pub const GRADUATION_YEAR: &str = "Tahun Lulus";

pub const COMPANY_NAME: &str = "Nama Perusahaan";
pub const START_DATE: &str = "Tanggal Mulai";
pub const END_DATE: &str = "Tanggal Selesai";
pub const DESCRIPTION: &str = "Deskripsi";

pub const CERTIFICATION_NAME: &str = "Nama Sertifikasi";
pub const ISSUER: &str = "Penerbit";
pub const ISSUE_DATE: &str = "Tanggal Terbit";
pub const EXPIRY_DATE: &str = "Tanggal Kadaluarsa";

pub const ORGANIZATION: &str = "Nama Organisasi";

// ─── Sheets ──────────────────────────────────────────────────────────────────

pub const EMPLOYEES: SheetSchema = SheetSchema {
  name:    "Data Karyawan",
  columns: &[
    col(LOCAL_ID, "Contoh: K001"),
    col(FULL_NAME, "Contoh: John Doe"),
    col(EMAIL, "Contoh: john.doe@example.com"),
    col(BIRTH_DATE, "Contoh: 1990-01-01"),
    col(POSITION, "Contoh: Manager"),
    col(DEPARTMENT, "Contoh: IT"),
    col(LEVEL, "Contoh: BOD-3"),
    col(JOB_FAMILY, "Contoh: Technical"),
    col(TALENT_MOBILITY, "Contoh: Yes"),
    col(COMPANY_ID, "Contoh: 1"),
  ],
};

pub const EDUCATION: SheetSchema = SheetSchema {
  name:    "Data Pendidikan",
  columns: &[
    col(LOCAL_ID, "Contoh: K001"),
    col(EDUCATION_LEVEL, "Contoh: S1"),
    col(INSTITUTION, "Contoh: Universitas Indonesia"),
    col(MAJOR, "Contoh: Teknik Informatika"),
    col(ENTRY_YEAR, "Contoh: 2010"),
    col(GRADUATION_YEAR, "Contoh: 2014"),
  ],
};

pub const WORK_EXPERIENCE: SheetSchema = SheetSchema {
  name:    "Pengalaman Kerja",
  columns: &[
    col(LOCAL_ID, "Contoh: K001"),
    col(COMPANY_NAME, "Contoh: PT XYZ"),
    col(POSITION, "Contoh: Software Developer"),
    col(START_DATE, "Contoh: 2015-01-01"),
    col(END_DATE, "Contoh: 2020-12-31"),
    col(DESCRIPTION, "Contoh: Pengembangan aplikasi web"),
  ],
};

pub const CERTIFICATIONS: SheetSchema = SheetSchema {
  name:    "Sertifikasi",
  columns: &[
    col(LOCAL_ID, "Contoh: K001"),
    col(CERTIFICATION_NAME, "Contoh: AWS Certified Developer"),
    col(ISSUER, "Contoh: Amazon Web Services"),
    col(ISSUE_DATE, "Contoh: 2021-06-01"),
    col(EXPIRY_DATE, "Contoh: 2024-06-01"),
    col(DESCRIPTION, "Contoh: Sertifikasi untuk pengembang AWS"),
  ],
};

pub const ORGANIZATION_HISTORY: SheetSchema = SheetSchema {
  name:    "Riwayat Organisasi",
  columns: &[
    col(LOCAL_ID, "Contoh: K001"),
    col(ORGANIZATION, "Contoh: Komunitas Programmer Indonesia"),
    col(POSITION, "Contoh: Ketua"),
    col(START_DATE, "Contoh: 2018-01-01"),
    col(END_DATE, "Contoh: 2020-12-31"),
    col(DESCRIPTION, "Contoh: Memimpin komunitas dengan 1000+ anggota"),
  ],
};

/// Every required sheet, in validation order.
pub const REQUIRED_SHEETS: [SheetSchema; 5] =
  [EMPLOYEES, EDUCATION, WORK_EXPERIENCE, CERTIFICATIONS, ORGANIZATION_HISTORY];

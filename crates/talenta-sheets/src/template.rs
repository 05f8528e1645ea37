//! The downloadable upload template.
//!
//! Each required sheet gets its exact headers, one example row and one
//! blank row; the "Petunjuk" sheet carries fill-in instructions and the
//! current company directory.

use rust_xlsxwriter::{Workbook, XlsxError};
use talenta_core::company::Company;

use crate::{
  export::{header_format, write_headers},
  read::INSTRUCTIONS_SHEET,
  schema::REQUIRED_SHEETS,
};

const INSTRUCTIONS: &[&str] = &[
  "Petunjuk Pengisian Template:",
  "1. Isi data pada setiap sheet sesuai dengan contoh yang diberikan.",
  "2. Pastikan ID Karyawan konsisten di semua sheet untuk data yang berkaitan dengan karyawan yang sama.",
  "   Catatan: ID Karyawan digunakan untuk mencocokkan data antar sheet, bukan sebagai ID di database.",
  "3. Format tanggal: YYYY-MM-DD (contoh: 2023-05-25)",
  "4. Untuk kolom Talent Mobility, isi dengan \"Yes\" atau \"No\".",
  "5. ID Perusahaan harus sesuai dengan ID yang ada di sistem. Lihat daftar perusahaan di bawah.",
  "6. Level karyawan harus diisi dengan salah satu dari: BOD-1, BOD-2, BOD-3, BOD-4, atau BOD-5.",
  "7. Jenjang Pendidikan harus diisi dengan salah satu dari: D3, S1, S2, atau S3.",
  "8. Pastikan untuk mengisi Tanggal Lahir pada sheet Data Karyawan dengan format yang benar (YYYY-MM-DD).",
  "9. Jika ada kolom yang tidak relevan, biarkan kosong.",
  "10. Tambahkan baris sesuai kebutuhan untuk setiap karyawan.",
];

/// Render the template as xlsx bytes, listing `companies` in the
/// instructions sheet.
pub fn write_template(companies: &[Company]) -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  let bold = header_format();

  for schema in REQUIRED_SHEETS {
    let sheet = workbook.add_worksheet();
    sheet.set_name(schema.name)?;
    let headers: Vec<&str> = schema.headers().collect();
    write_headers(sheet, &headers, &bold)?;
    for (col, column) in (0u16..).zip(schema.columns) {
      sheet.write_string(1, col, column.example)?;
    }
    // Row 2 stays blank for the first real entry.
  }

  let sheet = workbook.add_worksheet();
  sheet.set_name(INSTRUCTIONS_SHEET)?;
  sheet.set_column_width(0, 12.0)?;
  sheet.set_column_width(1, 60.0)?;
  let mut row = 0u32;
  for line in INSTRUCTIONS {
    sheet.write_string(row, 0, *line)?;
    row += 1;
  }
  row += 1;
  sheet.write_string_with_format(row, 0, "Daftar Perusahaan:", &bold)?;
  row += 1;
  sheet.write_string_with_format(row, 0, "ID", &bold)?;
  sheet.write_string_with_format(row, 1, "Nama Perusahaan", &bold)?;
  for company in companies {
    row += 1;
    sheet.write_number(row, 0, company.id.0 as f64)?;
    sheet.write_string(row, 1, &company.name)?;
  }

  tracing::debug!(companies = companies.len(), "template written");
  workbook.save_to_buffer()
}

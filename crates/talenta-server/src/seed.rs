//! Idempotent seeding of the company directory and the bootstrap superadmin.

use talenta_core::{
  company::NewCompany,
  store::PortalStore,
  user::{NewUser, Role, User},
};

use crate::ServerConfig;

/// The group's companies as `(name, description, is_parent)`.
pub const COMPANIES: [(&str, &str, bool); 11] = [
  (
    "PT Bahana Pembinaan Usaha Indonesia (Persero)",
    "BPUI adalah perusahaan induk yang bergerak di bidang jasa keuangan dan investasi.",
    true,
  ),
  (
    "PT Asuransi Kerugian Jasa Raharja",
    "Perusahaan asuransi yang fokus pada perlindungan masyarakat dalam bidang transportasi.",
    false,
  ),
  (
    "PT Jaminan Kredit Indonesia",
    "Menyediakan jaminan kredit untuk mendukung pengembangan UMKM di Indonesia.",
    false,
  ),
  (
    "PT Asuransi Kredit Indonesia",
    "Spesialis dalam asuransi kredit dan penjaminan untuk mendukung pertumbuhan ekonomi.",
    false,
  ),
  (
    "PT Asuransi Jasa Indonesia",
    "Menyediakan berbagai produk asuransi umum untuk perlindungan aset dan bisnis.",
    false,
  ),
  (
    "PT Asuransi Jiwa IFG Life",
    "Fokus pada penyediaan asuransi jiwa dan produk investasi untuk masyarakat Indonesia.",
    false,
  ),
  (
    "PT Bahana TCW Investment Management",
    "Manajer investasi yang menawarkan berbagai produk reksa dana dan solusi investasi.",
    false,
  ),
  (
    "PT Bahana Sekuritas",
    "Perusahaan sekuritas yang menyediakan layanan perdagangan efek dan riset pasar modal.",
    false,
  ),
  (
    "PT Bahana Artha Ventura",
    "Bergerak dalam pembiayaan modal ventura untuk mendukung pertumbuhan usaha.",
    false,
  ),
  (
    "PT Bahana Kapital Investa",
    "Menyediakan layanan manajemen aset dan investasi untuk institusi dan individu.",
    false,
  ),
  (
    "PT Grahaniaga Tatautama",
    "Bergerak dalam bidang teknologi informasi untuk mendukung grup BPUI dan klien eksternal.",
    false,
  ),
];

/// Add every company of [`COMPANIES`] not yet present by name. Returns the
/// number added.
pub async fn seed_companies<S: PortalStore>(store: &S) -> Result<usize, S::Error> {
  let existing = store.list_companies().await?;
  let mut added = 0;
  for (name, description, is_parent) in COMPANIES {
    if existing.iter().any(|c| c.name == name) {
      continue;
    }
    store
      .add_company(NewCompany {
        name: name.to_owned(),
        description: Some(description.to_owned()),
        is_parent,
      })
      .await?;
    added += 1;
  }
  tracing::info!(added, total = COMPANIES.len(), "companies seeded");
  Ok(added)
}

/// Create the configured superadmin unless a user with that email exists.
///
/// Does nothing when `admin_email` or `admin_password_hash` is unset.
pub async fn ensure_admin<S: PortalStore>(
  store: &S,
  config: &ServerConfig,
) -> Result<Option<User>, S::Error> {
  let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash) else {
    return Ok(None);
  };
  if store.find_user_by_email(email.clone()).await?.is_some() {
    return Ok(None);
  }

  let user = store
    .add_user(NewUser {
      name:          config.admin_name.clone().unwrap_or_else(|| "Administrator".to_owned()),
      email:         email.clone(),
      password_hash: hash.clone(),
      role:          Role::Superadmin,
      company_id:    None,
    })
    .await?;
  tracing::info!(user_id = %user.id, email = %user.email, "bootstrap superadmin created");
  Ok(Some(user))
}

//! Catalog tables.
//!
//! `.META.` holds one row per user region, keyed by region name; `-ROOT-`
//! holds the row of the `.META.` region. Both are regular tables with a
//! single `info` family, so they can be scanned from the shell.

use byteorder::{BigEndian, ByteOrder};

use colshell_core::{
    to_string_binary, FamilyDescriptor, TableDescriptor, META_TABLE_NAME, ROOT_TABLE_NAME,
};

use crate::table::MemRegion;

/// Family of every catalog column.
pub const CATALOG_FAMILY: &str = "info";
/// Serialized region description.
pub const REGIONINFO_QUALIFIER: &str = "regioninfo";
/// `host:port` of the hosting server.
pub const SERVER_QUALIFIER: &str = "server";
/// Start code of the hosting server, 8-byte big-endian.
pub const STARTCODE_QUALIFIER: &str = "serverstartcode";

/// Schema of a catalog table.
pub(crate) fn catalog_descriptor(name: &str) -> TableDescriptor {
    let mut descriptor = TableDescriptor::new(name);
    let mut info = FamilyDescriptor::new(CATALOG_FAMILY).with_versions(10);
    info.in_memory = true;
    info.block_size = 8 * 1024;
    descriptor.put_family(info);
    descriptor
}

/// Catalog table that records the regions of `table`, if any.
pub(crate) fn catalog_for(table: &str) -> Option<&'static str> {
    match table {
        ROOT_TABLE_NAME => None,
        META_TABLE_NAME => Some(ROOT_TABLE_NAME),
        _ => Some(META_TABLE_NAME),
    }
}

/// `(qualifier, value)` pairs of the catalog row describing `region`.
pub(crate) fn region_cells(
    region: &MemRegion,
    descriptor: &TableDescriptor,
    server: Option<(String, u64)>,
) -> Vec<(Vec<u8>, Vec<u8>)> {
    let info = &region.info;
    let regioninfo = format!(
        "REGION => {{NAME => '{}', STARTKEY => '{}', ENDKEY => '{}', ENCODED => {}, \
         OFFLINE => {}, TABLE => {}}}",
        info.name(),
        to_string_binary(&info.start_key),
        to_string_binary(&info.end_key),
        info.id,
        info.offline,
        descriptor
    );
    let mut cells = vec![(
        REGIONINFO_QUALIFIER.as_bytes().to_vec(),
        regioninfo.into_bytes(),
    )];
    if let Some((address, start_code)) = server {
        let mut code = [0u8; 8];
        BigEndian::write_u64(&mut code, start_code);
        cells.push((SERVER_QUALIFIER.as_bytes().to_vec(), address.into_bytes()));
        cells.push((STARTCODE_QUALIFIER.as_bytes().to_vec(), code.to_vec()));
    }
    cells
}

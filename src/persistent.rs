use crate::{data::VacancyRecord, CrawlerError};
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};
use tracing::debug;

/// Writes `records` to `path`, replacing whatever was there.
pub fn write_vacancies<P: AsRef<Path>>(
    path: P,
    records: &[VacancyRecord],
) -> Result<(), CrawlerError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_vacancies_to(file, records)?;
    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

pub fn write_vacancies_to<W: Write>(
    writer: W,
    records: &[VacancyRecord],
) -> Result<(), CrawlerError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(VacancyRecord::FIELDS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_vacancies<P: AsRef<Path>>(path: P) -> Result<Vec<VacancyRecord>, CrawlerError> {
    read_vacancies_from(fs::File::open(path)?)
}

pub fn read_vacancies_from<R: Read>(reader: R) -> Result<Vec<VacancyRecord>, CrawlerError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?;
    if headers.iter().ne(VacancyRecord::FIELDS) {
        return Err(CrawlerError::UnexpectedHeader(
            headers.iter().map(ToString::to_string).collect(),
        ));
    }

    let mut records = vec![];
    for row in reader.records() {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        if let Some(record) = VacancyRecord::from_row(fields.as_slice()) {
            records.push(record);
        }
    }
    Ok(records)
}

use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable xlsx package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Workbook read error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Missing workbook part: {0}")]
    MissingPart(String),

    #[error("Workbook contains no worksheets")]
    NoSheets,
}

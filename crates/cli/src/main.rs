use bcd_core::{
    resolve_intake, BcdError, BcdResult, DiagnosticReport, ImageMediaType, IntakeForm,
    ReportRenderer, UploadedImage,
};
use bcd_types::NonEmptyText;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bcd")]
#[command(about = "BCD diagnostic front-end CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an intake submission
    Resolve {
        /// Patient ID from the text-analysis form
        #[arg(long, default_value = "")]
        text_patient_id: String,
        /// Patient ID from the image-analysis form
        #[arg(long, default_value = "")]
        image_patient_id: String,
        /// Path to a mammogram image (JPEG, PNG, or DICOM)
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Render a report document from a diagnostic report JSON file
    Render {
        /// Path to the report JSON file
        report: PathBuf,
        /// Render the print variant (no manual print trigger)
        #[arg(long)]
        for_print: bool,
        /// Write the document to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve {
            text_patient_id,
            image_patient_id,
            image,
        }) => {
            let image = match image {
                Some(path) => Some(load_image(&path)?),
                None => None,
            };
            let form = IntakeForm {
                text_patient_id,
                image_patient_id,
                image,
            };
            match resolve_intake(form) {
                Ok(submission) => println!(
                    "Mode: {}, Patient ID: {}",
                    submission.mode.as_str(),
                    submission.patient_id
                ),
                Err(e) => eprintln!("Error resolving intake: {}", e),
            }
        }
        Some(Commands::Render {
            report,
            for_print,
            output,
        }) => match render_document(&report, for_print) {
            Ok(document) => match output {
                Some(path) => fs::write(&path, document).map_err(BcdError::FileWrite)?,
                None => println!("{}", document),
            },
            Err(e) => eprintln!("Error rendering report: {}", e),
        },
        None => {
            println!("Use 'bcd --help' for commands");
        }
    }

    Ok(())
}

/// Loads a mammogram image from disk, classifying its media type from the
/// file extension with content sniffing as a fallback.
fn load_image(path: &Path) -> BcdResult<UploadedImage> {
    let bytes = fs::read(path).map_err(BcdError::FileRead)?;
    let declared = match path.extension().and_then(|ext| ext.to_str()) {
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        Some("dcm") | Some("dicom") => Some("application/dicom"),
        _ => None,
    };
    let media_type = ImageMediaType::resolve(declared, &bytes)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(NonEmptyText::new)
        .transpose()
        .ok()
        .flatten()
        .ok_or_else(|| BcdError::Validation("image path has no usable file name".into()))?;

    Ok(UploadedImage {
        file_name,
        media_type,
        bytes,
    })
}

/// Reads a diagnostic report JSON file and renders the requested document
/// variant.
fn render_document(report_path: &Path, for_print: bool) -> BcdResult<String> {
    let json = fs::read_to_string(report_path).map_err(BcdError::FileRead)?;
    let report: DiagnosticReport =
        serde_json::from_str(&json).map_err(BcdError::Deserialization)?;

    let renderer = ReportRenderer::default();
    Ok(if for_print {
        renderer.print_document(&report)
    } else {
        renderer.preview_document(&report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_report_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("report.json");
        let json = serde_json::json!({
            "patient_id": "P1",
            "text": { "diagnosis": "Benign", "description": "d" },
            "image": {
                "diagnosis": "",
                "breast_side": "",
                "breast_density": "",
                "image_view": "",
                "abnormality_id": "",
                "abnormality_type": "",
                "calcification_type": "",
                "calcification_distribution": "",
                "assessment": "",
                "subtlety": "",
                "description": ""
            },
            "generated_at": "2026-08-27T12:00:00Z"
        });
        let mut file = fs::File::create(&path).expect("create report file");
        write!(file, "{}", json).expect("write report file");
        path
    }

    #[test]
    fn renders_report_file_in_both_variants() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_report_file(&dir);

        let preview = render_document(&path, false).unwrap();
        let print = render_document(&path, true).unwrap();
        assert!(preview.contains("Patient Report for ID: P1"));
        assert!(preview.contains("window.print()"));
        assert!(!print.contains("window.print()"));
    }

    #[test]
    fn missing_report_file_is_an_error() {
        let err = render_document(Path::new("/nonexistent/report.json"), false).unwrap_err();
        assert!(matches!(err, BcdError::FileRead(_)));
    }

    #[test]
    fn load_image_classifies_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.png");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).expect("write image");

        let image = load_image(&path).unwrap();
        assert_eq!(image.media_type, ImageMediaType::Png);
        assert_eq!(image.file_name.as_str(), "scan.png");
    }
}

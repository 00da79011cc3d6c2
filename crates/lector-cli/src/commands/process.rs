//! Process command - read a single DNI card photograph.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use lector_core::{DniData, Lector, LectorConfig, LectorResult, TesseractRecognizer};

/// File types accepted as input photographs.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Maximum accepted input size, 10 MB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input photograph (PNG, JPG, JPEG or BMP)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the recognized raw text in the output
    #[arg(long)]
    raw_text: bool,

    /// Omit the annotated image from the output
    #[arg(long)]
    no_image: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON response envelope
    Json,
    /// Plain text summary
    Text,
}

/// Success envelope, `exito` is always true.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub exito: bool,
    pub mensaje: String,
    pub datos: DniData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texto: Option<String>,
}

/// Error envelope with a stable machine-readable code.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub codigo: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, codigo: &str) -> Self {
        Self {
            error: error.into(),
            codigo: codigo.to_string(),
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if let Err(resp) = validate_input(&args.input) {
        return fail(&resp);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Starting OCR engine...");
    pb.set_position(10);

    let recognizer = match TesseractRecognizer::new(config.ocr.clone()) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            return fail(&ErrorResponse::new(e.to_string(), "OCR_ERROR"));
        }
    };

    pb.set_message("Reading card...");
    pb.set_position(40);

    let lector = Lector::new(recognizer, config);
    let result = match lector.read_dni(&args.input) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            return fail(&ErrorResponse::new(e.to_string(), e.code()));
        }
    };

    pb.finish_with_message("Done");

    let response = build_response(result, args.no_image, args.raw_text);
    let output = format_response(&response, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Reject missing files, disallowed extensions and oversized uploads
/// before any pixel work happens.
pub fn validate_input(path: &Path) -> Result<(), ErrorResponse> {
    if !path.exists() {
        return Err(ErrorResponse::new(
            format!("Archivo no encontrado: {}", path.display()),
            "FILE_NOT_FOUND",
        ));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ErrorResponse::new(
            "Formato no permitido. Use PNG, JPG, JPEG o BMP",
            "INVALID_FORMAT",
        ));
    }

    let size = fs::metadata(path)
        .map_err(|e| ErrorResponse::new(e.to_string(), "FILE_NOT_FOUND"))?
        .len();

    if size > MAX_FILE_SIZE {
        return Err(ErrorResponse::new(
            "El archivo excede el tamaño máximo de 10MB",
            "FILE_TOO_LARGE",
        ));
    }

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LectorConfig> {
    if let Some(path) = config_path {
        Ok(LectorConfig::from_file(Path::new(path))?)
    } else {
        Ok(LectorConfig::default())
    }
}

pub fn build_response(result: LectorResult, no_image: bool, raw_text: bool) -> SuccessResponse {
    SuccessResponse {
        exito: true,
        mensaje: "DNI procesado correctamente".to_string(),
        datos: result.datos,
        imagen: if no_image { None } else { Some(result.imagen) },
        texto: if raw_text { result.texto } else { None },
    }
}

pub fn format_response(response: &SuccessResponse, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Text => Ok(format_text(&response.datos)),
    }
}

/// Print the error envelope and exit non-zero.
fn fail(resp: &ErrorResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    std::process::exit(1);
}

fn format_text(datos: &DniData) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Documento: {} {}\n",
        datos.tipo_documento.as_deref().unwrap_or("-"),
        datos.numero_documento.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Titular:\n");
    output.push_str(&format!(
        "  Primer apellido:  {}\n",
        datos.primer_apellido.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Segundo apellido: {}\n",
        datos.segundo_apellido.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Prenombres:       {}\n",
        datos.prenombres.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str(&format!(
        "Nacimiento:   {}",
        datos.fecha_nacimiento.as_deref().unwrap_or("-")
    ));
    if let Some(edad) = datos.edad {
        output.push_str(&format!(" ({} años)", edad));
    }
    output.push('\n');
    output.push_str(&format!(
        "Sexo:         {}\n",
        datos.sexo.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Estado civil: {}\n",
        datos.estado_civil.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Procesado:    {}\n", datos.fecha_hora_ingreso));

    output
}

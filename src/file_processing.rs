use anyhow::Context;

/// Checks that the input path exists.
///
/// # Arguments
/// * `path` - Input file or directory given on the command line.
///
/// # Returns
/// * `anyhow::Result<()>` - Success or an error naming the missing path.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", path.display()));
    }
    anyhow::Ok(())
}

/// Creates the parent directory of an output file if it is missing.
pub fn ensure_parent_dir_exist<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    anyhow::Ok(())
}

/// Lists the labeled CSV files to process.
///
/// A file path is returned as-is. A directory is scanned (not recursively)
/// for `.csv` files whose name contains `pattern`; the result is sorted so
/// output rows come out in a stable order.
///
/// # Arguments
/// * `input` - A labeled CSV file or a directory of them.
/// * `pattern` - Substring a file name must contain to be picked up.
///
/// # Returns
/// * `anyhow::Result<Vec<PathBuf>>` - Files to process.
///
/// # Errors
/// * If the directory cannot be read.
/// * If no file matches.
pub fn collect_input_files<P: AsRef<std::path::Path>>(
    input: P,
    pattern: &str,
) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let input = input.as_ref();
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut paths = std::fs::read_dir(input)
        .with_context(|| format!("Failed to read directory {}", input.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(pattern))
        })
        .collect::<Vec<_>>();
    paths.sort();

    if paths.is_empty() {
        return Err(anyhow::anyhow!(
            "No .csv files containing {:?} found in {}",
            pattern,
            input.display()
        ));
    }
    Ok(paths)
}

/// Row types that can be written by [`write_csv_rows`].
///
/// `HEADERS` must list the same column names, in the same order, as the
/// type's `Serialize` impl produces. It is used when there are no rows to
/// infer the header from.
pub trait CsvHeader {
    const HEADERS: &'static [&'static str];
}

/// Writes rows to a CSV file, with a header row taken from the row type.
///
/// With `append` set, rows are added to the end of an existing file and the
/// header is only written when the file is new or empty. An empty `rows`
/// still leaves a header-only file behind, so readers never see a blank file.
///
/// # Arguments
/// * `path` - Output CSV path.
/// * `rows` - Rows to write.
/// * `append` - Append instead of truncating.
///
/// # Returns
/// * `anyhow::Result<()>` - Success or an I/O/serialization error.
pub fn write_csv_rows<P, T>(path: P, rows: &[T], append: bool) -> anyhow::Result<()>
where
    P: AsRef<std::path::Path>,
    T: serde::Serialize + CsvHeader,
{
    let path = path.as_ref();
    let has_content = append && std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!has_content)
        .from_writer(file);
    if rows.is_empty() && !has_content {
        writer.write_record(T::HEADERS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    anyhow::Ok(())
}

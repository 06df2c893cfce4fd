//! Bundled sample dataset for trying the wizard without your own data.

use std::path::{Path, PathBuf};

pub const SAMPLE_FILE_NAME: &str = "processed_data.csv";

pub const SAMPLE_CSV: &str = "\
Unnamed: 0,age,gender,caste_category,region,income_bracket,health_score,access_to_hospital,treatment_priority
0,45,1,2,3,3,72.5,True,65.2
1,32,0,1,2,2,68.3,True,58.7
2,58,1,3,1,4,81.2,False,72.4
3,29,0,2,3,1,63.8,True,54.3
4,67,1,1,2,5,89.4,True,78.9
5,41,0,3,1,3,75.1,False,66.8
6,36,1,2,3,2,70.6,True,61.2
7,52,0,1,2,4,77.9,True,69.5
8,44,1,3,1,3,73.2,False,64.7
9,61,0,2,3,5,85.6,True,75.3
";

/// Write the sample CSV into `dir`, creating it if needed.
pub fn write_sample(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(SAMPLE_FILE_NAME);
    std::fs::write(&path, SAMPLE_CSV)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let lines: Vec<&str> = SAMPLE_CSV.lines().collect();
        assert_eq!(lines.len(), 11);
        for line in &lines {
            assert_eq!(line.split(',').count(), 9);
        }
    }

    #[test]
    fn test_write_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir.path().join("nested")).unwrap();
        assert!(path.ends_with(SAMPLE_FILE_NAME));
        assert_eq!(std::fs::read_to_string(path).unwrap(), SAMPLE_CSV);
    }
}

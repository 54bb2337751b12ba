use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::app::CharacterKind;

use super::database::{CharacterDef, ContentDatabase, MissionCategory, MissionDef};
use super::discovery::collect_def_files_sorted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    DuplicateDef,
}

#[derive(Debug, Clone)]
pub struct ContentCompileError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentCompileError {}

/// Compiles every def file under `defs_dir` into a content database. The
/// whole compile fails on the first rejected def; callers degrade to the
/// built-in data.
pub fn compile_content_database(defs_dir: &Path) -> Result<ContentDatabase, ContentCompileError> {
    let files = collect_def_files_sorted(defs_dir)
        .map_err(|error| read_error(error.path, error.source))?;

    let mut missions = Vec::<MissionDef>::new();
    let mut characters = Vec::<CharacterDef>::new();
    let mut seen_character_names = HashSet::<String>::new();

    for file in files {
        let raw = fs::read_to_string(&file)
            .map_err(|source| read_error(file.clone(), source))?;
        parse_defs_document(
            &file,
            &raw,
            &mut missions,
            &mut characters,
            &mut seen_character_names,
        )?;
    }

    Ok(ContentDatabase::from_defs(missions, characters))
}

fn parse_defs_document(
    file_path: &Path,
    raw: &str,
    missions: &mut Vec<MissionDef>,
    characters: &mut Vec<CharacterDef>,
    seen_character_names: &mut HashSet<String>,
) -> Result<(), ContentCompileError> {
    let doc = Document::parse(raw).map_err(|error| ContentCompileError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Defs" {
        return Err(error_at_node(
            ContentErrorCode::InvalidRoot,
            "root element must be <Defs>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "MissionDef" => missions.push(parse_mission_def(file_path, &doc, child)?),
            "CharacterDef" => {
                let def = parse_character_def(file_path, &doc, child)?;
                if !seen_character_names.insert(def.def_name.clone()) {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        format!(
                            "duplicate CharacterDef '{}'; each defName may appear only once",
                            def.def_name
                        ),
                        file_path,
                        &doc,
                        child,
                    ));
                }
                characters.push(def);
            }
            other => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownDefType,
                    format!(
                        "unsupported def type <{other}>; supported types: MissionDef, CharacterDef"
                    ),
                    file_path,
                    &doc,
                    child,
                ))
            }
        }
    }

    Ok(())
}

fn parse_mission_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<MissionDef, ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut category: Option<MissionCategory> = None;
    let mut prompt: Option<String> = None;
    let mut time_limit_seconds: Option<u32> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <MissionDef>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "category" => {
                let value = required_text(file_path, doc, field, "category")?;
                let parsed = MissionCategory::from_token(&value).ok_or_else(|| {
                    error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!(
                            "invalid category '{value}'; allowed values: Body, Hands, Group"
                        ),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                category = Some(parsed);
            }
            "prompt" => {
                prompt = Some(required_text(file_path, doc, field, "prompt")?);
            }
            "timeLimitSeconds" => {
                let value = required_text(file_path, doc, field, "timeLimitSeconds")?;
                let parsed = value.parse::<u32>().map_err(|_| {
                    error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!("timeLimitSeconds '{value}' is not a valid whole number"),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                if parsed == 0 {
                    return Err(error_at_node(
                        ContentErrorCode::InvalidValue,
                        "timeLimitSeconds must be greater than zero".to_string(),
                        file_path,
                        doc,
                        field,
                    ));
                }
                time_limit_seconds = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <MissionDef>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(category) = category else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <category> in <MissionDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(prompt) = prompt else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <prompt> in <MissionDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(time_limit_seconds) = time_limit_seconds else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <timeLimitSeconds> in <MissionDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };

    Ok(MissionDef {
        category,
        prompt,
        time_limit_seconds,
    })
}

fn parse_character_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<CharacterDef, ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut label: Option<String> = None;
    let mut kind: Option<CharacterKind> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <CharacterDef>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "defName" => {
                def_name = Some(required_text(file_path, doc, field, "defName")?);
            }
            "label" => {
                label = Some(required_text(file_path, doc, field, "label")?);
            }
            "kind" => {
                let value = required_text(file_path, doc, field, "kind")?;
                let parsed = CharacterKind::from_token(&value).ok_or_else(|| {
                    error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!(
                            "invalid kind '{value}'; allowed values: Rabbit, Bear, Cat, Frog"
                        ),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                kind = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <CharacterDef>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(def_name) = def_name else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <defName> in <CharacterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(label) = label else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <label> in <CharacterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(kind) = kind else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <kind> in <CharacterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };

    Ok(CharacterDef {
        def_name,
        label,
        kind,
    })
}

fn required_text(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, ContentCompileError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            format!("field <{field_name}> must not be empty"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: ContentErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> ContentCompileError {
    let pos = doc.text_pos_at(node.range().start);
    ContentCompileError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}

fn read_error(path: PathBuf, source: std::io::Error) -> ContentCompileError {
    ContentCompileError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read {}: {source}", path.display()),
        file_path: path,
        location: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_one(xml: &str) -> Result<ContentDatabase, ContentCompileError> {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("defs.xml"), xml).expect("write defs");
        compile_content_database(temp.path())
    }

    #[test]
    fn compiles_mission_and_character_defs() {
        let database = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Body</category>
                    <prompt>Do three star jumps</prompt>
                    <timeLimitSeconds>15</timeLimitSeconds>
                </MissionDef>
                <CharacterDef>
                    <defName>trail.cat</defName>
                    <label>Cat</label>
                    <kind>Cat</kind>
                </CharacterDef>
            </Defs>"#,
        )
        .expect("compile");

        let pool = database.mission_pool(MissionCategory::Body);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].prompt, "Do three star jumps");
        assert_eq!(pool[0].time_limit_seconds, 15);
        let cat = database.character_by_name("trail.cat").expect("cat def");
        assert_eq!(cat.kind, CharacterKind::Cat);
    }

    #[test]
    fn rejects_wrong_root_element() {
        let error = compile_one("<Things/>").err().expect("error");
        assert_eq!(error.code, ContentErrorCode::InvalidRoot);
    }

    #[test]
    fn rejects_unknown_def_type() {
        let error = compile_one("<Defs><WeaponDef/></Defs>").err().expect("error");
        assert_eq!(error.code, ContentErrorCode::UnknownDefType);
    }

    #[test]
    fn rejects_unknown_field_with_location() {
        let error = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Body</category>
                    <prompt>Stretch</prompt>
                    <timeLimitSeconds>10</timeLimitSeconds>
                    <difficulty>hard</difficulty>
                </MissionDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(error.code, ContentErrorCode::UnknownField);
        let location = error.location.expect("location");
        assert!(location.line > 1);
    }

    #[test]
    fn rejects_duplicate_field() {
        let error = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Body</category>
                    <category>Hands</category>
                    <prompt>Stretch</prompt>
                    <timeLimitSeconds>10</timeLimitSeconds>
                </MissionDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(error.code, ContentErrorCode::DuplicateField);
    }

    #[test]
    fn rejects_missing_field() {
        let error = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Group</category>
                    <prompt>Wave</prompt>
                </MissionDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(error.code, ContentErrorCode::MissingField);
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_category = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Feet</category>
                    <prompt>Stomp</prompt>
                    <timeLimitSeconds>10</timeLimitSeconds>
                </MissionDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(bad_category.code, ContentErrorCode::InvalidValue);

        let zero_time = compile_one(
            r#"<Defs>
                <MissionDef>
                    <category>Body</category>
                    <prompt>Stomp</prompt>
                    <timeLimitSeconds>0</timeLimitSeconds>
                </MissionDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(zero_time.code, ContentErrorCode::InvalidValue);

        let bad_kind = compile_one(
            r#"<Defs>
                <CharacterDef>
                    <defName>trail.dragon</defName>
                    <label>Dragon</label>
                    <kind>Dragon</kind>
                </CharacterDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(bad_kind.code, ContentErrorCode::InvalidValue);
    }

    #[test]
    fn rejects_duplicate_character_def_name() {
        let error = compile_one(
            r#"<Defs>
                <CharacterDef>
                    <defName>trail.cat</defName>
                    <label>Cat</label>
                    <kind>Cat</kind>
                </CharacterDef>
                <CharacterDef>
                    <defName>trail.cat</defName>
                    <label>Other Cat</label>
                    <kind>Cat</kind>
                </CharacterDef>
            </Defs>"#,
        )
        .err()
        .expect("error");
        assert_eq!(error.code, ContentErrorCode::DuplicateDef);
    }

    #[test]
    fn rejects_malformed_xml_with_parse_position() {
        let error = compile_one("<Defs><MissionDef>").err().expect("error");
        assert_eq!(error.code, ContentErrorCode::XmlMalformed);
        assert!(error.location.is_some());
    }
}

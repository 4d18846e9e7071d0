//! Lexer states and their transitions.
//!
//! Each variant carries only the buffer it needs.  [`State::process`]
//! consumes the current state together with one character and returns the
//! next state; some transitions hand the same character on to the state
//! they switch to (e.g. a name ended by a newline lets the newline reach
//! the docblock state).

use super::names::{
    TagFilter, is_identifier, is_identifier_char, is_name_terminator, is_type_char, is_type_name,
};
use super::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum State {
    /// Between annotations, skipping `*` decoration and whitespace.
    Docblock,
    /// Inside prose; lasts until the end of the line.
    Text,
    AnnotationName { name: String },
    /// Inside a `[Type]` cast.
    AnnotationType { buffer: String },
    /// Inside an `{argument}` binding.
    Argument { buffer: String },
    /// After the name, a cast, or a binding.
    Annotation,
    /// Inside `( ... )`, between parameters.
    Params,
    ParamName { buffer: String },
    ParamValue(ValueBuffer),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ValueBuffer {
    text: String,
    quote: Option<char>,
    escaped: bool,
    line_start: bool,
}

impl ValueBuffer {
    fn quoted(quote: char) -> Self {
        Self {
            quote: Some(quote),
            ..Self::default()
        }
    }
}

impl State {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            State::Docblock => "docblock",
            State::Text => "text",
            State::AnnotationName { .. } => "annotation name",
            State::AnnotationType { .. } => "annotation type",
            State::Argument { .. } => "argument",
            State::Annotation => "annotation",
            State::Params => "params",
            State::ParamName { .. } => "param name",
            State::ParamValue(_) => "param value",
        }
    }

    /// Whether the scan may end in this state.
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, State::Docblock | State::Text)
    }

    pub(crate) fn process(
        self,
        ch: char,
        table: &mut Table,
        tags: &TagFilter,
    ) -> Result<State, String> {
        match self {
            State::Docblock => Ok(match ch {
                '@' => State::AnnotationName {
                    name: String::new(),
                },
                '*' | ' ' | '\t' | '\r' | '\n' => State::Docblock,
                _ => State::Text,
            }),

            State::Text => Ok(if ch == '\n' {
                State::Docblock
            } else {
                State::Text
            }),

            State::AnnotationName { mut name } => {
                if !is_name_terminator(ch) {
                    name.push(ch);
                    return Ok(State::AnnotationName { name });
                }
                if name.is_empty() || tags.is_prose(&name) {
                    return State::Text.process(ch, table, tags);
                }
                if !is_identifier(&name) {
                    return Err(format!("`{name}` is not a valid annotation name"));
                }
                table.register_annotation(name);
                match ch {
                    '(' => Ok(State::Params),
                    '[' => Ok(State::AnnotationType {
                        buffer: String::new(),
                    }),
                    '{' => Ok(State::Argument {
                        buffer: String::new(),
                    }),
                    _ => State::Annotation.process(ch, table, tags),
                }
            }

            State::AnnotationType { mut buffer } => match ch {
                ']' => {
                    if buffer.is_empty() {
                        return Err("annotation type cast must not be empty".to_string());
                    }
                    if !is_type_name(&buffer) {
                        return Err(format!("`{buffer}` is not a valid annotation type"));
                    }
                    table.set_type(buffer)?;
                    Ok(State::Annotation)
                }
                c if is_type_char(c) => {
                    buffer.push(c);
                    Ok(State::AnnotationType { buffer })
                }
                c => Err(format!(
                    "unexpected `{}` in annotation type, only letters, digits, underscores and backslashes are allowed",
                    c.escape_default()
                )),
            },

            State::Argument { mut buffer } => match ch {
                '}' => {
                    if !is_identifier(&buffer) {
                        return Err(format!("`{buffer}` is not a valid argument name"));
                    }
                    table.bind_argument(buffer)?;
                    Ok(State::Annotation)
                }
                c if is_identifier_char(c) => {
                    buffer.push(c);
                    Ok(State::Argument { buffer })
                }
                c => Err(format!(
                    "unexpected `{}` in argument name, only letters, digits and underscores are allowed",
                    c.escape_default()
                )),
            },

            State::Annotation => match ch {
                '(' => Ok(State::Params),
                '[' => Ok(State::AnnotationType {
                    buffer: String::new(),
                }),
                '{' => Ok(State::Argument {
                    buffer: String::new(),
                }),
                _ => State::Docblock.process(ch, table, tags),
            },

            State::Params => match ch {
                ')' => Ok(State::Docblock),
                ' ' | '\t' | '\r' | '\n' | '*' | ',' => Ok(State::Params),
                '\'' | '"' => Ok(State::ParamValue(ValueBuffer::quoted(ch))),
                _ => State::ParamName {
                    buffer: String::new(),
                }
                .process(ch, table, tags),
            },

            State::ParamName { mut buffer } => match ch {
                '=' => {
                    let name = buffer.trim();
                    if name.is_empty() {
                        return Err("parameter name must not be empty".to_string());
                    }
                    if !is_identifier(name) {
                        return Err(format!("`{name}` is not a valid parameter name"));
                    }
                    table.register_param(name);
                    Ok(State::ParamValue(ValueBuffer::default()))
                }
                '\'' | '"' => Err(format!(
                    "unexpected quote after `{}`, expected `=`",
                    buffer.trim()
                )),
                ',' => Err(format!("parameter `{}` has no value", buffer.trim())),
                ')' => {
                    let value = buffer.trim();
                    if !value.is_empty() {
                        table.set_param_value(value.to_string(), false)?;
                    }
                    Ok(State::Docblock)
                }
                c => {
                    buffer.push(c);
                    Ok(State::ParamName { buffer })
                }
            },

            State::ParamValue(value) => process_value(value, ch, table),
        }
    }
}

fn process_value(mut value: ValueBuffer, ch: char, table: &mut Table) -> Result<State, String> {
    if let Some(quote) = value.quote {
        if value.escaped {
            value.text.push(ch);
            value.escaped = false;
        } else if ch == '\\' {
            value.escaped = true;
        } else if ch == quote {
            table.set_param_value(value.text, true)?;
            return Ok(State::Params);
        } else {
            value.text.push(ch);
        }
        return Ok(State::ParamValue(value));
    }

    match ch {
        '\'' | '"' if value.text.is_empty() => value.quote = Some(ch),
        ',' | ')' => {
            let text = value.text.trim_end().to_string();
            table.set_param_value(text, false)?;
            return Ok(if ch == ',' {
                State::Params
            } else {
                State::Docblock
            });
        }
        '\n' => {
            if !value.text.is_empty() {
                value.text.push('\n');
            }
            value.line_start = true;
        }
        ' ' | '\t' | '\r' if value.text.is_empty() || value.line_start => {}
        '*' if value.line_start => {}
        c => {
            value.line_start = false;
            value.text.push(c);
        }
    }
    Ok(State::ParamValue(value))
}

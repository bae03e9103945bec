//! Documentation content for the odata CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Grammar,
    Operators,
    Functions,
    Literals,
    QueryOptions,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "grammar" | "syntax" => Some(Self::Grammar),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "fn" => Some(Self::Functions),
            "literals" | "literal" | "types" => Some(Self::Literals),
            "query_options" | "query" | "options" => Some(Self::QueryOptions),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"ODATA FILTER DOCUMENTATION

odata parses OData V4 $filter expressions into a syntax tree and validates
system query options. Nothing is executed; the output is the parsed structure.

DOCUMENTATION CATEGORIES

  grammar           Expression structure, precedence and grouping
  operators         Comparison and logical operators
  functions         contains, startswith, endswith
  literals          Strings, numbers, booleans and null
  query-options     $filter, $select, $orderby, $top and friends

QUICK REFERENCE

  Name eq 'Milk'                    Comparison
  Address/City ne 'Berlin'          Navigation path
  Price gt 5 and Price lt 10        Logical and
  not (A eq 1 or B eq 2)            Negated group
  contains(Name, 'ilk')             Function call

Run 'odata doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Grammar) => Ok(GRAMMAR_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Literals) => Ok(LITERALS_DOC),
        Some(DocCategory::QueryOptions) => Ok(QUERY_OPTIONS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const GRAMMAR_DOC: &str = r#"GRAMMAR

  expression   := or_expr
  or_expr      := and_expr ( "or" and_expr )*
  and_expr     := unary_expr ( "and" unary_expr )*
  unary_expr   := "not" unary_expr | primary
  primary      := "(" expression ")" | comparison | function_call
  comparison   := field_path comparison_op literal
  function_call:= func_name "(" field_path "," literal ")"
  field_path   := identifier ( "/" identifier )*

PRECEDENCE (loosest first)
  or  <  and  <  not

  a eq 1 or b eq 2 and c eq 3      parses as   a eq 1 or (b eq 2 and c eq 3)
  a eq 1 and b eq 2 and c eq 3     parses as   (a eq 1 and b eq 2) and c eq 3
  not a eq 1 and b eq 2            parses as   (not a eq 1) and b eq 2

GROUPING
  Parentheses override precedence and must balance:
    (a eq 1 or b eq 2) and c eq 3

RESTRICTIONS
  - The field is always on the left: 'x' eq Name is rejected
  - Keywords are case-insensitive: AND, Eq and NULL all work
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

COMPARISON
  eq    equal                  Name eq 'Milk'
  ne    not equal              Name ne null
  gt    greater than           Price gt 20
  ge    greater or equal       Price ge 20
  lt    less than              Price lt 20
  le    less or equal          Price le 20

LOGICAL
  and   both sides hold        Price gt 5 and Price lt 10
  or    either side holds      Kind eq 'A' or Kind eq 'B'
  not   negates its operand    not Discontinued eq true

  An identifier where an operator belongs is reported as an unsupported
  operator: Price between 5 fails with "unsupported operator 'between'".
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

  contains(field, 'text')      field contains text
  startswith(field, 'text')    field starts with text
  endswith(field, 'text')      field ends with text

  Every function takes exactly two arguments: a field path and a string
  literal. Names are case-insensitive.

  Examples:
    contains(Name, 'ilk')
    startswith(Address/City, 'Ber') and not endswith(Code, 'X')

  Errors:
    contains(Name)             function 'contains' expects 2 arguments, found 1
    contains(Name, 5)          second argument must be a string literal
    tolower(Name) eq 'x'       unsupported function 'tolower'
"#;

const LITERALS_DOC: &str = r#"LITERALS

STRINGS
  Single-quoted. Double a quote to embed it:
    'Milk'
    'O''Brien'       ->  O'Brien

NUMBERS
  Optional minus sign, digits, optional fraction. No exponents.
    42   -7   3.25
  Rejected: 1.   1.2.3   12abc

BOOLEANS AND NULL
  true  false  null   (any case)
"#;

const QUERY_OPTIONS_DOC: &str = r#"QUERY OPTIONS

  odata query 'https://host/Products?$filter=Price gt 5&$top=10'
  odata query '$select=Name,Price&$orderby=Price desc'

  $filter     parsed filter expression
  $select     comma-separated field list
  $expand     comma-separated navigation list
  $orderby    comma-separated 'field [asc|desc]', default asc
  $top        non-negative integer
  $skip       non-negative integer
  $count      true when the value is 'true' (any case)
  $search     free text, trimmed
  $format     json, xml, csv or tsv

  The first occurrence of an option wins. Empty values and unknown
  options are ignored.
"#;

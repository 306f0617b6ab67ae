//! Набор derive-макросов для приложений Stock Board.
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive-макрос `TableRow` генерирует для структуры реализацию трейта
/// `TableRow`: список заголовков колонок и отрисовку ячеек строки таблицы.
///
/// Заголовок колонки берётся из атрибута `#[column("...")]`, при его
/// отсутствии используется имя поля. Каждое поле превращается в ячейку
/// через трейт `ToCell`.
///
/// В области видимости должны быть доступны `TableRow` и `ToCell`.
///
/// ## Пример
///
/// ```ignore
/// use board_core::traits::{TableRow, ToCell};
/// use board_macros::TableRow;
///
/// #[derive(TableRow)]
/// struct Row {
///     #[column("Product Name")]
///     name: String,
///     quantity: u32,
/// }
///
/// assert_eq!(Row::columns(), &["Product Name", "quantity"]);
/// ```
#[proc_macro_derive(TableRow, attributes(column))]
pub fn derive_table_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let struct_name = &input.ident;

    let named = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => panic!("TableRow допустимо использовать только со структурами"),
    };

    let mut fields = Vec::with_capacity(named.len());
    let mut headers = Vec::with_capacity(named.len());

    for field in named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        let mut header = ident.to_string();
        for attr in &field.attrs {
            if attr.path().is_ident("column") {
                let s: LitStr = attr.parse_args().expect("column(\"...\")");
                header = s.value();
            }
        }

        fields.push(ident);
        headers.push(LitStr::new(&header, proc_macro2::Span::call_site()));
    }

    let expanded = quote! {
        impl TableRow for #struct_name {
            fn columns() -> &'static [&'static str] {
                &[#(#headers),*]
            }

            fn cells(&self) -> Vec<String> {
                vec![#(ToCell::to_cell(&self.#fields)),*]
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive-макрос для `Enum`: автоматически добавляет реализации
/// [`std::fmt::Display`], [`std::str::FromStr`] и метод `label()`.
///
/// - `#[label("...")]` — отображаемое значение варианта (по умолчанию имя
///   варианта в нижнем регистре).
/// - `#[alias("...")]` — дополнительные строки, которые принимает `FromStr`.
///
/// Разбор строки нечувствителен к регистру и пробелам по краям. Ошибка
/// разбора — `BoardError`, поэтому он должен быть в области видимости.
///
/// ## Пример
///
/// ```ignore
/// use board_macros::LabelEnum;
///
/// #[derive(Debug, Clone, LabelEnum)]
/// enum StockAction {
///     #[label("Added")]
///     #[alias("add")]
///     Add,
///     #[label("Deducted")]
///     #[alias("deduct")]
///     Deduct,
/// }
///
/// assert_eq!(StockAction::Add.to_string(), "Added");
/// assert!(matches!("ADD".parse(), Ok(StockAction::Add)));
/// ```
#[proc_macro_derive(LabelEnum, attributes(label, alias))]
pub fn derive_label_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match input.data {
        Data::Enum(e) => e.variants,
        _ => panic!("LabelEnum допустимо использовать только с enum"),
    };

    let mut label_arms = Vec::new();
    let mut from_arms = Vec::new();

    for v in variants {
        let ident = v.ident;
        if !matches!(v.fields, Fields::Unit) {
            panic!("Только unit-variants");
        }

        let mut label = ident.to_string().to_lowercase();
        let mut aliases = Vec::new();
        for attr in v.attrs {
            if attr.path().is_ident("label") {
                let s: LitStr = attr.parse_args().expect("label(\"...\")");
                label = s.value();
            } else if attr.path().is_ident("alias") {
                let s: LitStr = attr.parse_args().expect("alias(\"...\")");
                aliases.push(s.value().to_lowercase());
            }
        }

        let mut accepted = vec![label.to_lowercase()];
        for alias in aliases {
            if !accepted.contains(&alias) {
                accepted.push(alias);
            }
        }

        let label_lit = LitStr::new(&label, proc_macro2::Span::call_site());
        let accepted_lits: Vec<_> = accepted
            .iter()
            .map(|s| LitStr::new(s, proc_macro2::Span::call_site()))
            .collect();

        label_arms.push(quote! { #name::#ident => #label_lit, });
        from_arms.push(quote! { #(#accepted_lits)|* => Ok(#name::#ident), });
    }

    let expanded = quote! {
        impl #name {
            /// Отображаемое значение варианта.
            pub fn label(&self) -> &'static str {
                match self { #(#label_arms)* }
            }
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for #name {
            type Err = BoardError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    #(#from_arms)*
                    _ => Err(BoardError::value_err(format!(
                        "некорректное значение {}: {}",
                        stringify!(#name), s
                    ))),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

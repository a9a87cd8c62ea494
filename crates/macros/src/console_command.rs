//! `#[console_command]` expansion

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse::Parse, parse::ParseStream, Ident, ItemFn, LitStr, Token};

/// Parsed attribute arguments
///
/// - `#[console_command("css_testbarrier", "Spawn barriers for a site")]`
/// - `#[console_command("css_donebarriers", "Leave edit mode", permission = "@css/root")]`
pub struct ConsoleCommandArgs {
    pub name: LitStr,
    pub description: LitStr,
    pub permission: Option<LitStr>,
}

impl Parse for ConsoleCommandArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: LitStr = input.parse()?;
        input.parse::<Token![,]>()?;
        let description: LitStr = input.parse()?;

        let mut permission = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            let key: Ident = input.parse()?;
            if key != "permission" {
                return Err(syn::Error::new(key.span(), "expected `permission`"));
            }
            input.parse::<Token![=]>()?;
            permission = Some(input.parse::<LitStr>()?);
        }
        // Allow a trailing comma
        let _ = input.parse::<Option<Token![,]>>()?;

        if name.value().trim().is_empty() {
            return Err(syn::Error::new(name.span(), "command name must not be empty"));
        }

        Ok(Self {
            name,
            description,
            permission,
        })
    }
}

pub fn generate_console_command(args: ConsoleCommandArgs, func: ItemFn) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;
    let fn_name = &sig.ident;

    let key_static = format_ident!("__{}_COMMAND_KEY", fn_name.to_string().to_uppercase());
    let register_fn = format_ident!("{}_register", fn_name);
    let unregister_fn = format_ident!("{}_unregister", fn_name);

    let name = &args.name;
    let description = &args.description;
    let permission = match &args.permission {
        Some(perm) => quote! { ::core::option::Option::Some(#perm) },
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        static #key_static: ::std::sync::Mutex<
            ::core::option::Option<::retakes_core::commands::CommandKey>,
        > = ::std::sync::Mutex::new(::core::option::Option::None);

        #(#attrs)*
        #vis fn #fn_name(
            player: ::core::option::Option<&::retakes_core::entities::PlayerController>,
            info: &::retakes_core::commands::CommandInfo,
        ) -> ::retakes_core::commands::CommandResult #block

        /// Register this command with the command system
        #vis fn #register_fn() -> ::core::option::Option<::retakes_core::commands::CommandKey> {
            let key = ::retakes_core::commands::register_command_ex(
                #name,
                #description,
                #permission,
                #fn_name,
            )?;
            if let ::core::result::Result::Ok(mut slot) = #key_static.lock() {
                *slot = ::core::option::Option::Some(key);
            }
            ::core::option::Option::Some(key)
        }

        /// Unregister this command
        #vis fn #unregister_fn() -> bool {
            let key = match #key_static.lock() {
                ::core::result::Result::Ok(mut slot) => slot.take(),
                ::core::result::Result::Err(_) => ::core::option::Option::None,
            };
            match key {
                ::core::option::Option::Some(key) => {
                    ::retakes_core::commands::unregister_command(key)
                }
                ::core::option::Option::None => false,
            }
        }
    }
}

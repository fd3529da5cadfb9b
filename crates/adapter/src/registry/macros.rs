//! Declaration macros for converters.

/// Builds descriptors from adapter values and their declared pairs.
///
/// Evaluates to a `Vec<AdapterDef>` suitable for
/// [`AdapterEngine::new`](crate::AdapterEngine::new). Each adapter expression
/// is wrapped in one `Arc` shared by all of its pairs.
///
/// ```ignore
/// let engine = AdapterEngine::new(adapters![
/// 	NodeBadger => { dyn Node => NodeBadge },
/// 	TreeGlyphs::default() => {
/// 		dyn FileNode => dyn Glyph,
/// 		dyn FolderNode => dyn Glyph,
/// 	},
/// ])?;
/// ```
#[macro_export]
macro_rules! adapters {
	($($adapter:expr => { $($src:ty => $tgt:ty),+ $(,)? }),* $(,)?) => {{
		#[allow(unused_mut)]
		let mut defs: ::std::vec::Vec<$crate::AdapterDef> = ::std::vec::Vec::new();
		$(
			let instance = ::std::sync::Arc::new($adapter);
			$(
				defs.push($crate::AdapterDef::of::<_, $src, $tgt>(&instance));
			)+
		)*
		defs
	}};
}

/// Declares a static adapter value and submits its conversions for engines
/// built with [`AdapterEngine::from_inventory`](crate::AdapterEngine::from_inventory).
///
/// ```ignore
/// submit_adapters! {
/// 	TREE_GLYPHS: TreeGlyphs = TreeGlyphs::default() => {
/// 		dyn FileNode => dyn Glyph,
/// 		dyn FolderNode => dyn Glyph,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! submit_adapters {
	($name:ident: $ty:ty = $init:expr => { $($src:ty => $tgt:ty),+ $(,)? }) => {
		paste::paste! {
			static $name: ::std::sync::LazyLock<::std::sync::Arc<$ty>> =
				::std::sync::LazyLock::new(|| ::std::sync::Arc::new($init));

			#[allow(non_snake_case)]
			fn [<__adapters_ $name>]() -> ::std::vec::Vec<$crate::AdapterDef> {
				vec![$(
					$crate::AdapterDef::of::<$ty, $src, $tgt>(&*$name),
				)+]
			}

			inventory::submit! { $crate::AdapterReg([<__adapters_ $name>]) }
		}
	};
}

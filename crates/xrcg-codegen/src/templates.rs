//! TypeScript source templates for the generated extension module.
//!
//! Placeholders use `{{ name }}`; every value is inserted already encoded
//! (string literals through the JSON encoder), so the templates never quote.

/// Module header, constants and shared helpers.
pub const PRELUDE: &str = r#"// Generated by xrcg-tools from the command registry. Do not edit by hand.
import * as vscode from 'vscode';
import { execFile, spawn } from 'child_process';
import * as path from 'path';
import * as fs from 'fs';

const TOOL = {{ tool_name }};
const MIN_VERSION: Version = { major: {{ min_major }}, minor: {{ min_minor }}, patch: {{ min_patch }} };
const INSTALL_COMMAND: string[] = {{ install_command }};
const INPUT_EXTENSIONS: string[] = {{ extensions }};

type Version = { major: number; minor: number; patch: number };

function formatVersion(version: Version): string {
    return `${version.major}.${version.minor}.${version.patch}`;
}

export function parseVersion(text: string): Version | null {
    const match = text.match(/(\d+)\.(\d+)\.(\d+)/);
    if (!match) {
        return null;
    }
    return {
        major: parseInt(match[1], 10),
        minor: parseInt(match[2], 10),
        patch: parseInt(match[3], 10)
    };
}

function execTool(file: string, args: string[]): Promise<string> {
    return new Promise((resolve, reject) => {
        execFile(file, args, (error, stdout, stderr) => {
            if (error) {
                reject(error);
            } else {
                resolve(stdout ? stdout : stderr);
            }
        });
    });
}

function runTool(file: string, args: string[], outputChannel: vscode.OutputChannel): Promise<string> {
    return new Promise((resolve, reject) => {
        outputChannel.appendLine(`> ${file} ${args.join(' ')}`);
        const child = spawn(file, args);
        let output = '';
        const collect = (data: Buffer) => {
            const text = data.toString();
            output += text;
            outputChannel.append(text);
        };
        child.stdout?.on('data', collect);
        child.stderr?.on('data', collect);
        child.on('error', (error) => reject(error));
        child.on('close', (code) => {
            if (code === 0) {
                resolve(output);
            } else {
                reject(new Error(output.trim() || `${file} exited with code ${code}`));
            }
        });
    });
}

async function offerInstall(outputChannel: vscode.OutputChannel): Promise<boolean> {
    const choice = await vscode.window.showWarningMessage(
        `${TOOL} is not available. Do you want to install it?`, 'Yes', 'No');
    if (choice !== 'Yes') {
        return false;
    }
    try {
        await runTool(INSTALL_COMMAND[0], INSTALL_COMMAND.slice(1), outputChannel);
        vscode.window.showInformationMessage(`${TOOL} has been installed successfully.`);
        return true;
    } catch (error) {
        outputChannel.show(true);
        vscode.window.showErrorMessage(`Installing ${TOOL} failed: ${error instanceof Error ? error.message : error}`);
        return false;
    }
}

async function checkTool(outputChannel: vscode.OutputChannel): Promise<boolean> {
    let stdout: string;
    try {
        stdout = await execTool(TOOL, ['--version']);
    } catch {
        return offerInstall(outputChannel);
    }
    const version = parseVersion(stdout);
    if (!version) {
        return offerInstall(outputChannel);
    }
    if (version.major < MIN_VERSION.major) {
        vscode.window.showErrorMessage(
            `${TOOL} ${formatVersion(version)} is not compatible; version ${formatVersion(MIN_VERSION)} or newer is required.`);
        return false;
    }
    if (version.major === MIN_VERSION.major
        && (version.minor < MIN_VERSION.minor
            || (version.minor === MIN_VERSION.minor && version.patch < MIN_VERSION.patch))) {
        vscode.window.showWarningMessage(
            `${TOOL} ${formatVersion(version)} is older than ${formatVersion(MIN_VERSION)}. Please update.`);
    }
    return true;
}

export function getSuggestedOutputPath(inputFilePath: string, pattern: string): string {
    const inputFileName = inputFilePath ? path.basename(inputFilePath, path.extname(inputFilePath)) : '';
    const outFileName = pattern.replace('{input_file_name}', inputFileName);
    return path.join(path.dirname(inputFilePath), outFileName);
}

export function projectNameFor(inputFilePath: string): string {
    const fileName = path.basename(inputFilePath);
    for (const extension of INPUT_EXTENSIONS) {
        if (fileName.length > extension.length && fileName.endsWith(extension)) {
            return fileName.slice(0, fileName.length - extension.length);
        }
    }
    return path.basename(fileName, path.extname(fileName));
}

async function revealOutput(outputPath: vscode.Uri): Promise<void> {
    if (!fs.existsSync(outputPath.fsPath)) {
        return;
    }
    const stats = fs.statSync(outputPath.fsPath);
    if (stats.isFile()) {
        const document = await vscode.workspace.openTextDocument(outputPath);
        await vscode.window.showTextDocument(document);
    } else if (stats.isDirectory()) {
        await vscode.commands.executeCommand('vscode.openFolder', outputPath, true);
    }
}

async function runGenerate(
    uri: vscode.Uri | undefined,
    language: string,
    style: string,
    pattern: string,
    outputChannel: vscode.OutputChannel
): Promise<void> {
    if (!uri) {
        vscode.window.showErrorMessage('Select a definitions file to generate from.');
        return;
    }
    if (!await checkTool(outputChannel)) {
        return;
    }
    const inputPath = uri.fsPath;
    const suggestion = getSuggestedOutputPath(inputPath, pattern);
    const outputPath = await vscode.window.showSaveDialog({
        defaultUri: vscode.Uri.file(suggestion),
        saveLabel: 'Save Output',
        filters: { 'All Files': ['*'] }
    });
    if (!outputPath) {
        return;
    }
    const args = [
        'generate',
        '--projectname', projectNameFor(inputPath),
        '--language', language,
        '--style', style,
        '--definitions', inputPath,
        '--output', outputPath.fsPath
    ];
    try {
        await runTool(TOOL, args, outputChannel);
        await revealOutput(outputPath);
        vscode.window.showInformationMessage(`Generated ${path.basename(outputPath.fsPath)}`);
    } catch (error) {
        outputChannel.show(true);
        vscode.window.showErrorMessage(`${TOOL} failed: ${error instanceof Error ? error.message : error}`);
    }
}

export function activate(context: vscode.ExtensionContext) {
    const outputChannel = vscode.window.createOutputChannel({{ channel_name }});
    context.subscriptions.push(outputChannel);
"#;

/// One registration per command.
pub const HANDLER: &str = r#"
    context.subscriptions.push(vscode.commands.registerCommand({{ command_id }}, (uri?: vscode.Uri) =>
        runGenerate(uri, {{ language }}, {{ style }}, {{ output_pattern }}, outputChannel)));
"#;

/// Closes `activate` and adds `deactivate`.
pub const EPILOGUE: &str = r#"}

export function deactivate() {}
"#;
